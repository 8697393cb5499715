//! Translation gateway.
//!
//! Validates a translate request, resolves language codes for the provider
//! being called, invokes the primary adapter under a hard timeout and, if
//! that fails and a fallback adapter is configured, tries the fallback once.
//! Every request ends in exactly one [`GatewayResponse`].

mod metrics;

pub use metrics::{GatewayMetrics, MetricsReport};

use crate::languages::{is_auto, CodeResolver};
use crate::providers::{ProviderAdapter, ProviderError, ProviderOutcome, TranslationResult};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Message returned for every provider-side failure; details are only logged.
pub const SERVICE_ERROR_MESSAGE: &str = "Translation service error";

/// Translate request body as received over HTTP.
///
/// Every field is optional here so that missing fields surface as a
/// `BadRequest` from validation instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslateBody {
    pub text: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    /// `None` means auto-detect
    pub source_language: Option<String>,
    pub target_language: String,
}

impl TranslateBody {
    /// Check the required fields, normalizing an `auto`/blank source to `None`.
    pub fn validate(self) -> Result<TranslationRequest, String> {
        let text = match self.text {
            Some(text) if !text.trim().is_empty() => text,
            Some(_) => return Err("Text must not be empty".to_string()),
            None => return Err("Missing required fields: text".to_string()),
        };

        let target_language = match self.to.as_deref().map(str::trim) {
            Some(to) if !to.is_empty() => to.to_string(),
            _ => return Err("Missing required fields: to".to_string()),
        };

        let source_language = self
            .from
            .filter(|from| !is_auto(Some(from)))
            .map(|from| from.trim().to_string());

        Ok(TranslationRequest {
            text,
            source_language,
            target_language,
        })
    }
}

/// Terminal state of one translate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResponse {
    Ok(TranslationResult),
    BadRequest(String),
    ServiceError(String),
}

/// Routes translate requests to a primary provider with an optional single fallback.
pub struct TranslationGateway {
    resolver: Arc<CodeResolver>,
    primary: Arc<dyn ProviderAdapter>,
    fallback: Option<Arc<dyn ProviderAdapter>>,
    timeout: Duration,
    metrics: GatewayMetrics,
}

impl TranslationGateway {
    pub fn new(
        resolver: Arc<CodeResolver>,
        primary: Arc<dyn ProviderAdapter>,
        timeout: Duration,
    ) -> Self {
        Self {
            resolver,
            primary,
            fallback: None,
            timeout,
            metrics: GatewayMetrics::new(),
        }
    }

    /// Provider tried once when the primary fails.
    pub fn with_fallback(mut self, fallback: Arc<dyn ProviderAdapter>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    /// Handle one translate request end to end.
    pub async fn handle_translate(&self, body: TranslateBody) -> GatewayResponse {
        self.metrics.record_request();

        let request = match body.validate() {
            Ok(request) => request,
            Err(message) => {
                debug!("Rejected translate request: {}", message);
                self.metrics.record_rejected();
                return GatewayResponse::BadRequest(message);
            }
        };

        debug!(
            "Translation request: from={} to={} ({} chars)",
            request.source_language.as_deref().unwrap_or("auto"),
            request.target_language,
            request.text.chars().count()
        );

        let primary_error = match self.invoke(self.primary.as_ref(), &request).await {
            Ok(result) => {
                self.metrics.record_success();
                return GatewayResponse::Ok(result);
            }
            Err(e) => e,
        };

        warn!("Primary provider {} failed: {}", self.primary.kind(), primary_error);
        self.metrics.record_primary_failure();

        let Some(fallback) = self.fallback.as_ref() else {
            return self.service_error(&primary_error);
        };

        info!("Retrying translation with fallback provider {}", fallback.kind());
        self.metrics.record_fallback_attempt();

        match self.invoke(fallback.as_ref(), &request).await {
            Ok(result) => {
                self.metrics.record_fallback_success();
                self.metrics.record_success();
                GatewayResponse::Ok(result)
            }
            Err(e) => {
                warn!("Fallback provider {} failed: {}", fallback.kind(), e);
                self.service_error(&e)
            }
        }
    }

    /// Resolve codes for `adapter` and call it under the gateway timeout.
    async fn invoke(
        &self,
        adapter: &dyn ProviderAdapter,
        request: &TranslationRequest,
    ) -> ProviderOutcome {
        let kind = adapter.kind();
        let source = self
            .resolver
            .resolve_source(request.source_language.as_deref(), kind);
        let target = self.resolver.resolve(&request.target_language, kind);

        let call = adapter.translate(&request.text, &source, &target, self.timeout);
        let mut result = match tokio::time::timeout(self.timeout, call).await {
            Ok(outcome) => outcome?,
            Err(_) => {
                return Err(ProviderError::unavailable(format!(
                    "{} did not respond within {:?}",
                    kind, self.timeout
                )))
            }
        };

        // Detection is only meaningful when the caller asked for it
        if !source.is_auto() {
            result.detected_source_language = None;
        }
        Ok(result)
    }

    fn service_error(&self, cause: &ProviderError) -> GatewayResponse {
        error!("Translation failed: {}", cause);
        self.metrics.record_service_error();
        GatewayResponse::ServiceError(SERVICE_ERROR_MESSAGE.to_string())
    }
}
