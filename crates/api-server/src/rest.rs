//! Operational endpoints and the error body shared by every REST handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bistro_core::InsightsError;
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::state::AppState;

/// Handler error: an HTTP status plus a JSON body.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
    pub recommender_enabled: bool,
    pub feedback_enabled: bool,
}

pub(crate) fn api_error(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

/// Reject oversized batches at the API boundary. An empty batch is valid and
/// yields an empty report.
pub(crate) fn validate_batch(len: usize, max: usize, what: &str) -> Result<(), ApiError> {
    if len <= max {
        return Ok(());
    }
    let problem = format!("request exceeds the maximum of {max} {what} records");
    warn!(records = len, error = %problem, "Request validation failed");
    metrics::counter!("api.validation_errors").increment(1);
    Err(api_error(StatusCode::BAD_REQUEST, "invalid_request", problem))
}

/// Map an engine failure onto a response. Input problems are the caller's
/// fault; anything else is logged and reported generically.
pub(crate) fn engine_error(err: InsightsError, error_code: &str) -> ApiError {
    metrics::counter!("api.errors").increment(1);
    match err {
        InsightsError::Validation(_) | InsightsError::DimensionMismatch { .. } | InsightsError::EmptyVector => {
            warn!(error = %err, "Request rejected");
            api_error(StatusCode::BAD_REQUEST, err.code(), err.to_string())
        }
        InsightsError::Collaborator(_) => {
            error!(error = %err, code = error_code, "Collaborator call failed");
            api_error(
                StatusCode::BAD_GATEWAY,
                error_code,
                "An upstream service is unavailable",
            )
        }
        _ => {
            error!(error = %err, code = error_code, "Request processing failed");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                error_code,
                "Internal processing error",
            )
        }
    }
}

/// GET /health — Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Operations",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        recommender_enabled: state.recommender.is_some(),
        feedback_enabled: state.feedback.is_some(),
    })
}

/// GET /ready — Readiness check.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Operations",
    responses((status = 200, description = "Ready to accept traffic"))
)]
pub async fn readiness() -> StatusCode {
    // Engines are built before the router, so a running server is ready.
    StatusCode::OK
}

/// GET /live — Liveness check.
#[utoipa::path(
    get,
    path = "/live",
    tag = "Operations",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
