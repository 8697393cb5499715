//! Upstream translation providers.
//!
//! Each provider sits behind the [`ProviderAdapter`] trait so the gateway can
//! call any of them the same way. Adapters never return errors through any
//! other channel than [`ProviderOutcome`]: network trouble, timeouts, HTTP
//! errors and malformed bodies all become a [`ProviderError`] with an
//! [`ErrorKind`] the gateway can act on.
//!
//! - `mymemory`: pair-parameter GET provider (`langpair=en|es`)
//! - `libretranslate`: discrete-field POST provider (`source`, `target`, `format`)

mod libretranslate;
mod mymemory;

pub use libretranslate::LibreTranslateAdapter;
pub use mymemory::MyMemoryAdapter;

use crate::languages::SourceLanguage;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Identifies a provider family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    MyMemory,
    LibreTranslate,
}

impl ProviderKind {
    /// Configuration name of the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::MyMemory => "mymemory",
            ProviderKind::LibreTranslate => "libretranslate",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mymemory" => Ok(ProviderKind::MyMemory),
            "libretranslate" => Ok(ProviderKind::LibreTranslate),
            other => anyhow::bail!(
                "Unknown translation provider '{}' (expected 'mymemory' or 'libretranslate')",
                other
            ),
        }
    }
}

/// A successful translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_source_language: Option<String>,
}

/// Failure classes an adapter can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, timeout, or the provider is overloaded (429/5xx)
    Unavailable,
    /// The provider answered but not with the expected success shape
    InvalidResponse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Unavailable => f.write_str("provider unavailable"),
            ErrorKind::InvalidResponse => f.write_str("invalid provider response"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct ProviderError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl ProviderError {
    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Unavailable,
            detail: detail.into(),
        }
    }

    pub fn invalid_response(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidResponse,
            detail: detail.into(),
        }
    }

    /// Classify a transport-level `reqwest` error.
    ///
    /// Everything that happens before a response body is decoded (connect
    /// errors, timeouts, broken connections) counts as the provider being
    /// unavailable; decode errors mean the body had the wrong shape.
    pub fn from_reqwest(provider: ProviderKind, error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::invalid_response(format!("{} returned an unreadable body: {}", provider, error))
        } else if error.is_timeout() {
            Self::unavailable(format!("{} request timed out", provider))
        } else {
            Self::unavailable(format!("{} request failed: {}", provider, error))
        }
    }

    /// Classify a non-success HTTP status.
    ///
    /// Rate limiting and server errors are transient (`Unavailable`), every
    /// other status means the request or the response contract is off.
    pub fn from_status(provider: ProviderKind, status: reqwest::StatusCode, body: &str) -> Self {
        let detail = format!("{} API error ({}): {}", provider, status, body);
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Self::unavailable(detail)
        } else {
            Self::invalid_response(detail)
        }
    }
}

/// Result of a single provider call.
pub type ProviderOutcome = Result<TranslationResult, ProviderError>;

/// Uniform interface over one upstream translation provider.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Which provider family this adapter talks to (drives code resolution).
    fn kind(&self) -> ProviderKind;

    /// Translate `text` with already-resolved provider codes.
    ///
    /// Implementations issue exactly one outbound call bounded by `timeout`
    /// and map every failure into the returned outcome.
    async fn translate(
        &self,
        text: &str,
        source: &SourceLanguage,
        target: &str,
        timeout: Duration,
    ) -> ProviderOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!("mymemory".parse::<ProviderKind>().unwrap(), ProviderKind::MyMemory);
        assert_eq!(
            " LibreTranslate ".parse::<ProviderKind>().unwrap(),
            ProviderKind::LibreTranslate
        );
    }

    #[test]
    fn test_provider_kind_from_str_unknown() {
        let result = "deepl".parse::<ProviderKind>();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("deepl"));
    }

    #[test]
    fn test_provider_kind_display_matches_config_name() {
        for kind in [ProviderKind::MyMemory, ProviderKind::LibreTranslate] {
            assert_eq!(kind.to_string().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_from_status_classification() {
        let too_many = ProviderError::from_status(
            ProviderKind::MyMemory,
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            "slow down",
        );
        assert_eq!(too_many.kind, ErrorKind::Unavailable);

        let bad_gateway =
            ProviderError::from_status(ProviderKind::MyMemory, reqwest::StatusCode::BAD_GATEWAY, "");
        assert_eq!(bad_gateway.kind, ErrorKind::Unavailable);

        let bad_request = ProviderError::from_status(
            ProviderKind::LibreTranslate,
            reqwest::StatusCode::BAD_REQUEST,
            "unsupported language",
        );
        assert_eq!(bad_request.kind, ErrorKind::InvalidResponse);
        assert!(bad_request.detail.contains("400"));
        assert!(bad_request.detail.contains("unsupported language"));
    }

    #[test]
    fn test_translation_result_serialization_skips_missing_detection() {
        let result = TranslationResult {
            translated_text: "Hola".to_string(),
            detected_source_language: None,
        };
        let json = serde_json::to_string(&result).expect("Should serialize");
        assert_eq!(json, r#"{"translatedText":"Hola"}"#);
    }

    #[test]
    fn test_provider_error_display() {
        let error = ProviderError::unavailable("mymemory request timed out");
        assert_eq!(error.to_string(), "provider unavailable: mymemory request timed out");
    }
}
