use crate::languages::LanguageDescriptor;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

/// Supplies the supported-language list.
///
/// Prefers a live catalog when a URL is configured and silently falls back to
/// the built-in list on any failure; listing languages never errors.
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    client: reqwest::Client,
    url: Option<String>,
    timeout: Duration,
    fallback: Vec<LanguageDescriptor>,
}

impl LanguageCatalog {
    pub fn new(
        client: reqwest::Client,
        url: Option<String>,
        timeout: Duration,
        fallback: Vec<LanguageDescriptor>,
    ) -> Self {
        Self {
            client,
            url,
            timeout,
            fallback,
        }
    }

    /// Catalog that always serves `fallback`.
    pub fn offline(fallback: Vec<LanguageDescriptor>) -> Self {
        Self::new(reqwest::Client::new(), None, Duration::ZERO, fallback)
    }

    /// Supported languages in display order.
    pub async fn supported_languages(&self) -> Vec<LanguageDescriptor> {
        let Some(url) = self.url.as_deref() else {
            return self.fallback.clone();
        };

        match self.fetch_live(url).await {
            Ok(languages) if !languages.is_empty() => {
                debug!("Fetched {} languages from live catalog", languages.len());
                languages
            }
            Ok(_) => {
                warn!("Live language catalog at {} was empty, using built-in list", url);
                self.fallback.clone()
            }
            Err(e) => {
                warn!("Failed to fetch language catalog, using built-in list: {:#}", e);
                self.fallback.clone()
            }
        }
    }

    async fn fetch_live(&self, url: &str) -> Result<Vec<LanguageDescriptor>> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("Failed to send request to language catalog {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Language catalog error ({})", status);
        }

        let languages: Vec<LanguageDescriptor> = response
            .json()
            .await
            .context("Failed to parse language catalog response")?;

        Ok(dedupe_by_code(languages))
    }
}

/// Drop blank codes and later duplicates, keeping the provider's order.
fn dedupe_by_code(languages: Vec<LanguageDescriptor>) -> Vec<LanguageDescriptor> {
    let mut seen = HashSet::new();
    languages
        .into_iter()
        .filter(|language| !language.code.trim().is_empty())
        .filter(|language| seen.insert(language.code.clone()))
        .collect()
}
