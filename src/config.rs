use crate::languages::{CodeMapping, CodeResolver};
use crate::providers::ProviderKind;
use anyhow::{Context, Result};
use std::net::IpAddr;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_MYMEMORY_API_URL: &str = "https://api.mymemory.translated.net/get";
pub const DEFAULT_LIBRETRANSLATE_URL: &str = "https://libretranslate.com";

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: IpAddr,
    pub port: u16,
    pub allowed_origins: Vec<String>,

    // Providers
    pub provider: ProviderKind,
    pub fallback_provider: Option<ProviderKind>,

    // MyMemory
    pub mymemory_api_url: String,
    pub mymemory_email: Option<String>,

    // LibreTranslate
    pub libretranslate_url: String,
    pub libretranslate_api_key: Option<String>,

    // Timeouts
    pub translate_timeout: Duration,
    pub languages_timeout: Duration,

    // Language catalog
    pub language_catalog_url: Option<String>,

    // Code mapping overrides, merged over the built-in tables
    pub mymemory_code_overrides: CodeMapping,
    pub libretranslate_code_overrides: CodeMapping,
}

/// Read an env var, treating empty values as unset.
fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn timeout_secs(name: &str, default: u64) -> Result<Duration> {
    let secs = optional_env(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default);
    if secs == 0 {
        anyhow::bail!("{} must be greater than zero", name);
    }
    Ok(Duration::from_secs(secs))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let provider = match optional_env("TRANSLATION_PROVIDER") {
            Some(name) => name
                .parse::<ProviderKind>()
                .context("Invalid TRANSLATION_PROVIDER")?,
            None => ProviderKind::MyMemory,
        };

        let fallback_provider = optional_env("FALLBACK_PROVIDER")
            .map(|name| name.parse::<ProviderKind>())
            .transpose()
            .context("Invalid FALLBACK_PROVIDER")?;

        if fallback_provider == Some(provider) {
            anyhow::bail!(
                "FALLBACK_PROVIDER must differ from TRANSLATION_PROVIDER (both are '{}')",
                provider
            );
        }

        Ok(Self {
            // Server
            host: optional_env("HOST")
                .unwrap_or_else(|| "0.0.0.0".to_string())
                .parse()
                .context("HOST must be a valid IP address")?,
            port: optional_env("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10000),
            allowed_origins: optional_env("ALLOWED_ORIGIN")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            // Providers
            provider,
            fallback_provider,

            // MyMemory
            mymemory_api_url: optional_env("MYMEMORY_API_URL")
                .unwrap_or_else(|| DEFAULT_MYMEMORY_API_URL.to_string()),
            mymemory_email: optional_env("MYMEMORY_EMAIL"),

            // LibreTranslate
            libretranslate_url: optional_env("LIBRETRANSLATE_URL")
                .unwrap_or_else(|| DEFAULT_LIBRETRANSLATE_URL.to_string()),
            libretranslate_api_key: optional_env("LIBRETRANSLATE_API_KEY"),

            // Timeouts
            translate_timeout: timeout_secs("TRANSLATE_TIMEOUT_SECS", 15)?,
            languages_timeout: timeout_secs("LANGUAGES_TIMEOUT_SECS", 20)?,

            // Language catalog
            language_catalog_url: optional_env("LANGUAGE_CATALOG_URL"),

            // Code mapping overrides
            mymemory_code_overrides: optional_env("CODE_MAP_MYMEMORY")
                .map(|v| CodeMapping::parse_overrides(&v))
                .unwrap_or_default(),
            libretranslate_code_overrides: optional_env("CODE_MAP_LIBRETRANSLATE")
                .map(|v| CodeMapping::parse_overrides(&v))
                .unwrap_or_default(),
        })
    }

    /// Where to fetch the live language catalog, if anywhere.
    ///
    /// An explicit `LANGUAGE_CATALOG_URL` wins; otherwise a LibreTranslate
    /// primary publishes its own `/languages` list. MyMemory has none.
    pub fn catalog_url(&self) -> Option<String> {
        if let Some(url) = &self.language_catalog_url {
            return Some(url.clone());
        }
        match self.provider {
            ProviderKind::LibreTranslate => Some(format!(
                "{}/languages",
                self.libretranslate_url.trim_end_matches('/')
            )),
            ProviderKind::MyMemory => None,
        }
    }

    /// Built-in code tables with the configured overrides applied.
    pub fn code_resolver(&self) -> CodeResolver {
        for (kind, overrides) in [
            (ProviderKind::MyMemory, &self.mymemory_code_overrides),
            (ProviderKind::LibreTranslate, &self.libretranslate_code_overrides),
        ] {
            if !overrides.is_empty() {
                info!("Applying {} language code override(s) for {}", overrides.len(), kind);
            }
        }

        CodeResolver::new()
            .with_mapping(
                ProviderKind::MyMemory,
                CodeMapping::builtin(ProviderKind::MyMemory)
                    .merged_with(self.mymemory_code_overrides.clone()),
            )
            .with_mapping(
                ProviderKind::LibreTranslate,
                CodeMapping::builtin(ProviderKind::LibreTranslate)
                    .merged_with(self.libretranslate_code_overrides.clone()),
            )
    }
}
