use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::analysis::engine::{CooccurrenceEngine, CooccurrenceError, CooccurrenceResult};
use crate::cli::datasets::dataset_json;
use crate::cli::ServeArgs;
use crate::core::types::DEFAULT_COOCCURRENCE_DATASET;
use crate::utils::validation::{split_variant_list, validate_request_ids};

/// Security configuration constants to prevent `DoS` attacks
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const MAX_CONCURRENT_REQUESTS: usize = 100;
pub const MAX_BODY_SIZE: usize = 64 * 1024; // 64KB

/// Shared application state
pub struct AppState {
    pub engine: CooccurrenceEngine,
}

/// Enhanced error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Deserialize)]
struct CooccurrenceQuery {
    /// Comma-separated variant IDs
    variants: Option<String>,
    dataset: Option<String>,
}

#[derive(Deserialize)]
struct CooccurrenceRequest {
    variant_ids: Vec<String>,
    #[serde(default = "default_dataset")]
    dataset: String,
}

fn default_dataset() -> String {
    DEFAULT_COOCCURRENCE_DATASET.to_string()
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

/// HTTP status for a failed computation
#[must_use]
pub fn status_for(error: &CooccurrenceError) -> StatusCode {
    match error {
        CooccurrenceError::InputError(_)
        | CooccurrenceError::UnsupportedDataset(_)
        | CooccurrenceError::FormatMismatch(_) => StatusCode::BAD_REQUEST,
        CooccurrenceError::NotFound(_) => StatusCode::NOT_FOUND,
        CooccurrenceError::Eligibility(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn cooccurrence_error_response(error: &CooccurrenceError) -> ApiError {
    let status = status_for(error);
    tracing::debug!(%status, error_type = error.error_type(), "Co-occurrence request rejected");
    (
        status,
        Json(create_safe_error_response(
            error.error_type(),
            &error.to_string(),
            None,
        )),
    )
}

fn bad_request(error_type: &str, message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(create_safe_error_response(error_type, message, None)),
    )
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the data files cannot be loaded, the tokio runtime
/// cannot be created or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let engine = args.analysis.build_engine()?;
    let state = Arc::new(AppState { engine });

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args, state).await })
}

/// Routes and state without any middleware
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/cooccurrence",
            get(cooccurrence_get_handler).post(cooccurrence_post_handler),
        )
        .route("/api/datasets", get(datasets_handler))
        .route("/api/health", get(health_handler))
        .with_state(state)
}

/// Create the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is invalid.
pub fn create_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10)
        .burst_size(50)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?;

    let app = api_router(state).layer(
        ServiceBuilder::new()
            // Security headers for browser protection
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-content-type-options"),
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-frame-options"),
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("referrer-policy"),
                HeaderValue::from_static("no-referrer"),
            ))
            .layer(GovernorLayer {
                config: Arc::new(governor_conf),
            })
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(REQUEST_TIMEOUT_SECS),
            ))
            .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
            .layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
    );

    Ok(app)
}

async fn run_server(args: ServeArgs, state: Arc<AppState>) -> anyhow::Result<()> {
    let datasets = state.engine.registry().len();
    let app = create_router(state)?;

    let addr = format!("{}:{}", args.address, args.port);
    tracing::info!(datasets, "Starting variant-cooccurrence server at http://{addr}");
    println!("Starting variant-cooccurrence server at http://{addr}");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn compute(
    state: &AppState,
    variant_ids: &[String],
    dataset: &str,
) -> Result<Json<CooccurrenceResult>, ApiError> {
    if let Err(e) = validate_request_ids(variant_ids, dataset) {
        return Err(bad_request("validation_error", &e.to_string()));
    }

    state
        .engine
        .compute(variant_ids, dataset)
        .await
        .map(Json)
        .map_err(|e| cooccurrence_error_response(&e))
}

async fn cooccurrence_get_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CooccurrenceQuery>,
) -> Result<Json<CooccurrenceResult>, ApiError> {
    let variant_ids = query
        .variants
        .as_deref()
        .map(split_variant_list)
        .unwrap_or_default();
    let dataset = query.dataset.unwrap_or_else(default_dataset);

    compute(&state, &variant_ids, &dataset).await
}

async fn cooccurrence_post_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CooccurrenceRequest>, JsonRejection>,
) -> Result<Json<CooccurrenceResult>, ApiError> {
    let Json(request) = payload.map_err(|e| bad_request("invalid_request", &e.body_text()))?;

    compute(&state, &request.variant_ids, &request.dataset).await
}

/// Return the datasets the server has loaded
async fn datasets_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let supported = &state.engine.config().supported_datasets;
    let datasets: Vec<serde_json::Value> = state
        .engine
        .registry()
        .datasets()
        .map(|info| {
            let mut json = dataset_json(info);
            let enabled = supported.iter().any(|id| id == info.id);
            json["cooccurrence_enabled"] = serde_json::Value::Bool(enabled);
            json
        })
        .collect();

    Json(serde_json::json!({
        "count": datasets.len(),
        "datasets": datasets,
    }))
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "datasets": state.engine.registry().len(),
    }))
}
