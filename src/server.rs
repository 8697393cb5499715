//! HTTP surface of the gateway.
//!
//! Routes are mounted both at the root (`/translate`, `/languages`) and under
//! `/api/translate` for existing front ends.

use crate::config::Config;
use crate::gateway::{GatewayResponse, MetricsReport, TranslateBody, TranslationGateway};
use crate::languages::{builtin_languages, LanguageCatalog, LanguageDescriptor};
use crate::providers::{
    LibreTranslateAdapter, MyMemoryAdapter, ProviderAdapter, ProviderKind, TranslationResult,
};
use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<TranslationGateway>,
    pub catalog: Arc<LanguageCatalog>,
}

impl AppState {
    pub fn new(gateway: TranslationGateway, catalog: LanguageCatalog) -> Self {
        Self {
            gateway: Arc::new(gateway),
            catalog: Arc::new(catalog),
        }
    }

    /// Wire adapters, code tables and the catalog from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        let resolver = Arc::new(config.code_resolver());
        let primary = build_adapter(config.provider, config, &client);

        let mut gateway = TranslationGateway::new(resolver, primary, config.translate_timeout);
        if let Some(kind) = config.fallback_provider {
            info!("Fallback translation provider: {}", kind);
            gateway = gateway.with_fallback(build_adapter(kind, config, &client));
        }

        let catalog = match config.catalog_url() {
            Some(url) => {
                info!("Live language catalog: {}", url);
                LanguageCatalog::new(
                    client,
                    Some(url),
                    config.languages_timeout,
                    builtin_languages(),
                )
            }
            None => LanguageCatalog::offline(builtin_languages()),
        };

        info!(
            "Translation provider: {} (timeout {:?})",
            config.provider, config.translate_timeout
        );

        Ok(Self::new(gateway, catalog))
    }
}

fn build_adapter(
    kind: ProviderKind,
    config: &Config,
    client: &reqwest::Client,
) -> Arc<dyn ProviderAdapter> {
    match kind {
        ProviderKind::MyMemory => Arc::new(
            MyMemoryAdapter::new(client.clone(), config.mymemory_api_url.clone())
                .with_email(config.mymemory_email.clone()),
        ),
        ProviderKind::LibreTranslate => Arc::new(
            LibreTranslateAdapter::new(client.clone(), config.libretranslate_url.clone())
                .with_api_key(config.libretranslate_api_key.clone()),
        ),
    }
}

/// CORS for the configured origins; no origins means any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid ALLOWED_ORIGIN entry '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Build the router.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/metrics", get(metrics))
        .route("/languages", get(languages))
        .route("/translate", post(translate))
        .route("/api/translate", post(translate))
        .route("/api/translate/languages", get(languages))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ==================== Response Bodies ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateSuccess {
    success: bool,
    #[serde(flatten)]
    result: TranslationResult,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

#[derive(Debug, Serialize)]
struct LanguagesBody {
    success: bool,
    languages: Vec<LanguageDescriptor>,
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    service: &'static str,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ErrorBody {
            success: false,
            message,
        }),
    )
        .into_response()
}

impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        match self {
            GatewayResponse::Ok(result) => (
                StatusCode::OK,
                Json(TranslateSuccess {
                    success: true,
                    result,
                }),
            )
                .into_response(),
            GatewayResponse::BadRequest(message) => error_response(StatusCode::BAD_REQUEST, message),
            GatewayResponse::ServiceError(message) => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

// ==================== Handlers ====================

async fn health_check() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        service: "translation-gateway",
    })
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.gateway.metrics().report())
}

/// GET /languages
async fn languages(State(state): State<AppState>) -> Json<LanguagesBody> {
    Json(LanguagesBody {
        success: true,
        languages: state.catalog.supported_languages().await,
    })
}

/// POST /translate
///
/// An unparseable body is answered like any other invalid request rather
/// than with axum's plain-text rejection.
async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!("Rejected translate body: {}", rejection.body_text());
            let metrics = state.gateway.metrics();
            metrics.record_request();
            metrics.record_rejected();
            return GatewayResponse::BadRequest(format!(
                "Invalid request body: {}",
                rejection.body_text()
            ))
            .into_response();
        }
    };

    state.gateway.handle_translate(body).await.into_response()
}
