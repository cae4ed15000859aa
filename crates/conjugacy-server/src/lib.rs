//! HTTP conjugacy server.
//!
//! Accepts paired columns as JSON and answers with the conjugacy statistic.
//! Every request is computed independently; batch requests report success or
//! failure per dataset.

use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use conjugacy_core::{
    Conjugacy, ConjugacyEngine, ConjugacyError, Dataset, EngineConfig, Error, TieBreak,
    evaluate_all, format_plain,
};

/// Largest dataset a single request may carry.
const MAX_OBSERVATIONS: usize = 1_000_000;

/// Request body cap: two columns of `MAX_OBSERVATIONS` numbers at up to 32
/// bytes each. Sized so the observation check above is what rejects big
/// datasets, not the transport.
const MAX_BODY_BYTES: usize = 2 * 32 * MAX_OBSERVATIONS;

/// Shared server state.
struct AppState {
    config: EngineConfig,
}

#[derive(Deserialize)]
struct ComputeRequest {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Overrides the server's default tie-break for this request.
    tie_break: Option<TieBreak>,
}

#[derive(Deserialize)]
struct BatchRequest {
    datasets: Vec<NamedColumns>,
    tie_break: Option<TieBreak>,
}

#[derive(Deserialize)]
struct NamedColumns {
    name: Option<String>,
    x: Vec<f64>,
    y: Vec<f64>,
}

#[derive(Serialize)]
struct ComputeResponse {
    success: bool,
    #[serde(flatten)]
    result: Option<Conjugacy>,
    /// `"delta sigma conjugacy"` with two decimals.
    #[serde(skip_serializing_if = "Option::is_none")]
    formatted: Option<String>,
    /// Error message if request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ComputeResponse {
    fn ok(result: Conjugacy) -> Self {
        Self {
            success: true,
            formatted: Some(format_plain(&result)),
            result: Some(result),
            error: None,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            success: false,
            result: None,
            formatted: None,
            error: Some(message),
        }
    }
}

#[derive(Serialize)]
struct BatchEntry {
    name: String,
    #[serde(flatten)]
    response: ComputeResponse,
}

#[derive(Serialize)]
struct BatchResponse {
    total: usize,
    succeeded: usize,
    failed: usize,
    results: Vec<BatchEntry>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

fn engine_for(state: &AppState, tie_break: Option<TieBreak>) -> ConjugacyEngine {
    let mut config = state.config;
    if let Some(tb) = tie_break {
        config.tie_break = tb;
    }
    ConjugacyEngine::new(config)
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Input(_) => StatusCode::BAD_REQUEST,
        Error::Compute(ConjugacyError::InsufficientData { .. })
        | Error::Compute(ConjugacyError::NonFinite { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Output(_) | Error::Aborted(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn too_large(n: usize) -> Option<String> {
    (n > MAX_OBSERVATIONS).then(|| format!("too many observations: {n} > {MAX_OBSERVATIONS}"))
}

async fn handle_compute(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ComputeRequest>,
) -> (StatusCode, Json<ComputeResponse>) {
    if let Some(msg) = too_large(req.x.len().max(req.y.len())) {
        return Json(ComputeResponse::failed(msg)).with_status(StatusCode::PAYLOAD_TOO_LARGE);
    }
    let engine = engine_for(&state, req.tie_break);
    let outcome = Dataset::from_columns("request", &req.x, &req.y)
        .map_err(Error::from)
        .and_then(|ds| engine.compute(&ds.pairs).map_err(Error::from));

    match outcome {
        Ok(result) => Json(ComputeResponse::ok(result)).with_status(StatusCode::OK),
        Err(e) => {
            log::warn!("compute request rejected: {e}");
            Json(ComputeResponse::failed(e.to_string())).with_status(status_for(&e))
        }
    }
}

async fn handle_batch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> (StatusCode, Json<BatchResponse>) {
    let engine = engine_for(&state, req.tie_break);

    // Column mismatches are caught while building datasets; everything else
    // goes through the batch runner so each entry fails on its own.
    let mut results: Vec<Option<BatchEntry>> = Vec::with_capacity(req.datasets.len());
    let mut datasets = Vec::new();
    let mut pending = Vec::new();
    for (i, cols) in req.datasets.into_iter().enumerate() {
        let name = cols.name.unwrap_or_else(|| format!("dataset_{i}"));
        let rejected = too_large(cols.x.len().max(cols.y.len())).or_else(|| {
            match Dataset::from_columns(name.clone(), &cols.x, &cols.y) {
                Ok(ds) => {
                    datasets.push(ds);
                    pending.push((i, name.clone()));
                    None
                }
                Err(e) => Some(e.to_string()),
            }
        });
        results.push(rejected.map(|msg| BatchEntry {
            name,
            response: ComputeResponse::failed(msg),
        }));
    }

    let outcomes =
        match tokio::task::spawn_blocking(move || evaluate_all(&datasets, &engine, 0)).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                log::error!("batch evaluation aborted: {e}");
                Vec::new()
            }
        };
    let mut outcomes = outcomes.into_iter();
    for (pos, name) in pending {
        let response = match outcomes.next() {
            Some(outcome) => match outcome.result {
                Ok(r) => ComputeResponse::ok(r),
                Err(e) => ComputeResponse::failed(e.to_string()),
            },
            None => ComputeResponse::failed("batch evaluation aborted".to_string()),
        };
        results[pos] = Some(BatchEntry { name, response });
    }

    let results: Vec<BatchEntry> = results.into_iter().flatten().collect();
    let succeeded = results.iter().filter(|e| e.response.success).count();
    (
        StatusCode::OK,
        Json(BatchResponse {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }),
    )
}

trait JsonWithStatus<T> {
    fn with_status(self, status: StatusCode) -> (StatusCode, Json<T>);
}

impl<T> JsonWithStatus<T> for Json<T> {
    fn with_status(self, status: StatusCode) -> (StatusCode, Json<T>) {
        (status, self)
    }
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: conjugacy_core::VERSION.to_string(),
    })
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Conjugacy Server",
        "version": conjugacy_core::VERSION,
        "default_tie_break": state.config.tie_break,
        "endpoints": {
            "/": "This API index",
            "/api/v1/conjugacy": {
                "method": "POST",
                "description": "Compute delta, sigma and conjugacy for one paired sample",
                "body": {
                    "x": "Array of numbers",
                    "y": "Array of numbers, same length as x (at least 3)",
                    "tie_break": "Optional: input_order (default) or ascending_y",
                }
            },
            "/api/v1/conjugacy/batch": {
                "method": "POST",
                "description": "Compute many independent samples",
                "body": {
                    "datasets": "Array of { name?, x, y }",
                    "tie_break": "Optional, applies to every dataset",
                }
            },
            "/health": "Health check",
        },
        "examples": {
            "single": "curl -X POST -H 'content-type: application/json' -d '{\"x\":[1,2,3],\"y\":[3,2,1]}' /api/v1/conjugacy",
        }
    }))
}

/// Build the axum router.
fn build_router(config: EngineConfig) -> Router {
    let state = Arc::new(AppState { config });

    Router::new()
        .route("/", get(handle_index))
        .route("/api/v1/conjugacy", post(handle_compute))
        .route("/api/v1/conjugacy/batch", post(handle_batch))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Run the HTTP conjugacy server until the listener fails.
pub async fn run_server(config: EngineConfig, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(config);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("listening on {addr}");
    axum::serve(listener, app).await
}
