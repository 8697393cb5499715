use crate::languages::SourceLanguage;
use crate::providers::{
    ProviderAdapter, ProviderError, ProviderKind, ProviderOutcome, TranslationResult,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// MyMemory response envelope.
///
/// `responseStatus` is a number on success but MyMemory sends error codes as
/// strings (`"403"`), so it is kept as a raw value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: Option<ResponseData>,
    response_status: Option<serde_json::Value>,
    response_details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
    detected_language: Option<String>,
}

/// Numeric value of `responseStatus`, whether sent as a number or a string.
fn status_code(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Build the `langpair` parameter: `"en|es"`, or just `"es"` to let MyMemory detect.
fn build_langpair(source: &SourceLanguage, target: &str) -> String {
    match source {
        SourceLanguage::Auto => target.to_string(),
        SourceLanguage::Fixed(source) => format!("{}|{}", source, target),
    }
}

/// Adapter for the MyMemory `GET /get?q=..&langpair=..` API.
#[derive(Debug, Clone)]
pub struct MyMemoryAdapter {
    client: reqwest::Client,
    api_url: String,
    email: Option<String>,
}

impl MyMemoryAdapter {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            email: None,
        }
    }

    /// Contact email sent as `de`, which raises MyMemory's daily quota.
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    fn parse_body(body: &str) -> ProviderOutcome {
        let envelope: MyMemoryResponse = serde_json::from_str(body).map_err(|e| {
            ProviderError::invalid_response(format!("Failed to parse MyMemory response: {}", e))
        })?;

        if let Some(status) = envelope.response_status.as_ref() {
            if status_code(status) != Some(200) {
                let details = envelope
                    .response_details
                    .as_ref()
                    .map(|d| match d {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .unwrap_or_default();
                return Err(ProviderError::invalid_response(format!(
                    "MyMemory reported status {}: {}",
                    status, details
                )));
            }
        }

        let data = envelope.response_data.ok_or_else(|| {
            ProviderError::invalid_response("MyMemory response contained no responseData")
        })?;

        match data.translated_text {
            Some(text) if !text.trim().is_empty() => Ok(TranslationResult {
                translated_text: text,
                detected_source_language: data.detected_language.filter(|l| !l.is_empty()),
            }),
            _ => Err(ProviderError::invalid_response(
                "MyMemory response contained no translatedText",
            )),
        }
    }
}

#[async_trait]
impl ProviderAdapter for MyMemoryAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::MyMemory
    }

    async fn translate(
        &self,
        text: &str,
        source: &SourceLanguage,
        target: &str,
        timeout: Duration,
    ) -> ProviderOutcome {
        let langpair = build_langpair(source, target);
        debug!("Calling MyMemory with langpair: {}", langpair);

        let mut query = vec![("q", text), ("langpair", langpair.as_str())];
        if let Some(email) = self.email.as_deref() {
            query.push(("de", email));
        }

        let response = self
            .client
            .get(&self.api_url)
            .query(&query)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(self.kind(), e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(self.kind(), e))?;

        if !status.is_success() {
            return Err(ProviderError::from_status(self.kind(), status, &body));
        }

        Self::parse_body(&body)
    }
}
