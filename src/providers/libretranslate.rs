use crate::languages::{SourceLanguage, AUTO};
use crate::providers::{
    ProviderAdapter, ProviderError, ProviderKind, ProviderOutcome, TranslationResult,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// LibreTranslate `POST /translate` body.
#[derive(Debug, Serialize)]
struct LibreTranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibreTranslateResponse {
    translated_text: Option<String>,
    detected_language: Option<DetectedLanguage>,
}

#[derive(Debug, Deserialize)]
struct DetectedLanguage {
    language: String,
}

/// Adapter for a LibreTranslate instance.
#[derive(Debug, Clone)]
pub struct LibreTranslateAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LibreTranslateAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    fn translate_url(&self) -> String {
        format!("{}/translate", self.base_url)
    }

    fn parse_body(body: &str) -> ProviderOutcome {
        let envelope: LibreTranslateResponse = serde_json::from_str(body).map_err(|e| {
            ProviderError::invalid_response(format!(
                "Failed to parse LibreTranslate response: {}",
                e
            ))
        })?;

        match envelope.translated_text {
            Some(text) if !text.trim().is_empty() => Ok(TranslationResult {
                translated_text: text,
                detected_source_language: envelope.detected_language.map(|d| d.language),
            }),
            _ => Err(ProviderError::invalid_response(
                "LibreTranslate response contained no translatedText",
            )),
        }
    }
}

#[async_trait]
impl ProviderAdapter for LibreTranslateAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::LibreTranslate
    }

    async fn translate(
        &self,
        text: &str,
        source: &SourceLanguage,
        target: &str,
        timeout: Duration,
    ) -> ProviderOutcome {
        // LibreTranslate takes the sentinel itself as the "detect" source
        let source = match source {
            SourceLanguage::Auto => AUTO,
            SourceLanguage::Fixed(code) => code.as_str(),
        };
        debug!("Calling LibreTranslate with source={} target={}", source, target);

        let request = LibreTranslateRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(self.translate_url())
            .json(&request)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ErrorKind;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    // ==================== Request Structure Tests ====================

    #[test]
    fn test_request_serialization_without_api_key() {
        let request = LibreTranslateRequest {
            q: "Hello",
            source: "en",
            target: "es",
            format: "text",
            api_key: None,
        };

        let json = serde_json::to_value(&request).expect("Should serialize");
        assert_eq!(
            json,
            serde_json::json!({ "q": "Hello", "source": "en", "target": "es", "format": "text" })
        );
    }

    #[test]
    fn test_new_strips_trailing_slash() {
        let adapter = LibreTranslateAdapter::new(reqwest::Client::new(), "http://lt.local/");
        assert_eq!(adapter.translate_url(), "http://lt.local/translate");
    }

    // ==================== Response Parsing Tests ====================

    #[test]
    fn test_parse_body_with_detection() {
        let body = r#"{"translatedText":"Hola","detectedLanguage":{"confidence":92.0,"language":"en"}}"#;
        let result = LibreTranslateAdapter::parse_body(body).expect("Should succeed");
        assert_eq!(result.translated_text, "Hola");
        assert_eq!(result.detected_source_language.as_deref(), Some("en"));
    }

    #[test]
    fn test_parse_body_error_envelope() {
        let error = LibreTranslateAdapter::parse_body(r#"{"error":"Invalid API key"}"#)
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidResponse);
    }

    // ==================== HTTP Tests ====================

    #[tokio::test]
    async fn test_translate_posts_discrete_fields() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(body_json(serde_json::json!({
                "q": "Hello",
                "source": "zh-Hans",
                "target": "es",
                "format": "text",
                "api_key": "test-key"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "translatedText": "Hola" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let adapter = LibreTranslateAdapter::new(reqwest::Client::new(), mock_server.uri())
            .with_api_key(Some("test-key".to_string()));
        let result = adapter
            .translate(
                "Hello",
                &SourceLanguage::Fixed("zh-Hans".to_string()),
                "es",
                Duration::from_secs(5),
            )
            .await
            .expect("Should succeed");

        assert_eq!(result.translated_text, "Hola");
    }

    #[tokio::test]
    async fn test_translate_auto_sends_sentinel() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(body_json(serde_json::json!({
                "q": "Hello",
                "source": "auto",
                "target": "fr",
                "format": "text"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "translatedText": "Bonjour",
                "detectedLanguage": { "confidence": 90.0, "language": "en" }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let adapter = LibreTranslateAdapter::new(reqwest::Client::new(), mock_server.uri());
        let result = adapter
            .translate("Hello", &SourceLanguage::Auto, "fr", Duration::from_secs(5))
            .await
            .expect("Should succeed");

        assert_eq!(result.translated_text, "Bonjour");
        assert_eq!(result.detected_source_language.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_translate_client_error_is_invalid_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/translate"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({ "error": "xx is not supported" })),
            )
            .mount(&mock_server)
            .await;

        let adapter = LibreTranslateAdapter::new(reqwest::Client::new(), mock_server.uri());
        let error = adapter
            .translate("Hello", &SourceLanguage::Auto, "xx", Duration::from_secs(5))
            .await
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::InvalidResponse);
        assert!(error.detail.contains("not supported"));
    }

    #[tokio::test]
    async fn test_translate_rate_limited_is_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/translate"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let adapter = LibreTranslateAdapter::new(reqwest::Client::new(), mock_server.uri());
        let error = adapter
            .translate("Hello", &SourceLanguage::Auto, "es", Duration::from_secs(5))
            .await
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn test_translate_unreachable_is_unavailable() {
        let adapter = LibreTranslateAdapter::new(reqwest::Client::new(), "http://127.0.0.1:9");
        let error = adapter
            .translate("Hello", &SourceLanguage::Auto, "es", Duration::from_secs(2))
            .await
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::Unavailable);
    }
}
