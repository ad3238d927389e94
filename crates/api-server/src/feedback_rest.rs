//! Feedback analysis endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bistro_feedback::{FeedbackItem, FeedbackReport};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::rest::{api_error, validate_batch, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeedbackApiRequest {
    pub feedbacks: Vec<FeedbackItem>,
}

/// POST /v1/feedback/analyze — Classify feedback and aggregate insights.
#[utoipa::path(
    post,
    path = "/v1/feedback/analyze",
    tag = "Feedback",
    request_body = FeedbackApiRequest,
    responses(
        (status = 200, description = "Per-item analysis and batch insights", body = FeedbackReport),
        (status = 400, description = "Invalid batch", body = crate::rest::ErrorResponse),
        (status = 503, description = "No classifier configured", body = crate::rest::ErrorResponse),
    )
)]
pub async fn handle_analyze_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackApiRequest>,
) -> Result<Json<FeedbackReport>, ApiError> {
    validate_batch(request.feedbacks.len(), state.max_batch_size, "feedback")?;

    let Some(analyzer) = &state.feedback else {
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "classifier_unavailable",
            "no feedback classifier is configured",
        ));
    };

    let report = analyzer.analyze(&request.feedbacks).await;
    metrics::histogram!("feedback.batch_size").record(request.feedbacks.len() as f64);
    Ok(Json(report))
}
