//! HTTP API routes.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{info, Instrument};
use truthscan_common::logging::generate_trace_id;
use truthscan_common::util::mask_secret;
use truthscan_common::{Config, Error};

use crate::classifier::OpenAiClassifier;
use crate::credentials::{CredentialProvider, InMemoryCredentials};
use crate::datasets::{DatasetStore, Datasets};
use crate::dispatcher::Dispatcher;
use crate::error::DetectorError;
use crate::types::DetectionResponse;

/// Shortest accepted article, in characters.
pub const MIN_TEXT_CHARS: usize = 10;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub credentials: Arc<dyn CredentialProvider>,
    pub datasets: DatasetStore,
}

impl AppState {
    pub fn new(
        dispatcher: Dispatcher,
        credentials: Arc<dyn CredentialProvider>,
        datasets: DatasetStore,
    ) -> Self {
        Self {
            dispatcher,
            credentials,
            datasets,
        }
    }

    /// Wire the OpenAI classifier, in-memory credentials and dataset store from config.
    pub fn from_config(config: &Config) -> Self {
        let timeout = Duration::from_secs(config.classifier.timeout_secs);
        let classifier =
            OpenAiClassifier::new(&config.classifier.base_url, &config.classifier.model, timeout);

        Self::new(
            Dispatcher::new(Arc::new(classifier), timeout),
            Arc::new(InMemoryCredentials::new(config.classifier.api_key.clone())),
            DatasetStore::new(&config.datasets.dir),
        )
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Detection and sample datasets
        .route("/detect", get(list_datasets).post(detect))
        .route("/api/detect", get(list_datasets).post(detect))
        // Credential
        .route("/update-credential", post(update_credential))
        .route("/api/update-api-key", post(update_credential));

    with_service_layers(router).with_state(state)
}

/// Body limit and panic recovery shared by every route.
fn with_service_layers(router: Router<AppState>) -> Router<AppState> {
    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(handle_panic))
}

fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    DetectorError::Internal("handler panicked".into()).into_response()
}

// ============ Health Check ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    ai_configured: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "truthscan-detector",
        version: env!("CARGO_PKG_VERSION"),
        ai_configured: state.credentials.current().await.is_some(),
    })
}

// ============ Detection ============

fn parse_json_body(body: &[u8]) -> truthscan_common::Result<Value> {
    serde_json::from_slice(body)
        .map_err(|_| Error::InvalidInput("Request body must be valid JSON".into()))
}

/// Extract and validate the article text from a `/detect` body.
fn parse_detect_text(body: &[u8]) -> truthscan_common::Result<String> {
    let text = match parse_json_body(body)?.get("text") {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        _ => {
            return Err(Error::InvalidInput(
                "Text is required and must be a string".into(),
            ))
        }
    };

    if text.chars().count() < MIN_TEXT_CHARS {
        return Err(Error::InvalidInput(format!(
            "Text must be at least {MIN_TEXT_CHARS} characters long"
        )));
    }

    Ok(text)
}

async fn detect(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DetectionResponse>, DetectorError> {
    let text = parse_detect_text(&body)?;

    let trace_id = generate_trace_id();
    let span = truthscan_common::request_span!(
        "detect",
        trace_id,
        text_chars = text.chars().count()
    );

    // One snapshot per request; a concurrent key update does not affect it
    let api_key = state.credentials.current().await;
    let response = state
        .dispatcher
        .analyze(&text, api_key.as_deref())
        .instrument(span)
        .await;

    Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct DatasetsResponse {
    success: bool,
    data: Datasets,
    message: &'static str,
}

async fn list_datasets(State(state): State<AppState>) -> Json<DatasetsResponse> {
    let data = state.datasets.load_all().await;

    Json(DatasetsResponse {
        success: true,
        data,
        message: "CSV data loaded successfully",
    })
}

// ============ Credential ============

fn parse_api_key(body: &[u8]) -> truthscan_common::Result<String> {
    match parse_json_body(body)?.get("apiKey") {
        Some(Value::String(key)) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(Error::InvalidInput("API key is required".into())),
    }
}

async fn update_credential(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, DetectorError> {
    let api_key = parse_api_key(&body)?;
    let masked = mask_secret(&api_key);

    state.credentials.update(api_key).await;
    info!(api_key = %masked, "API key updated");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "API key updated successfully"
    })))
}
