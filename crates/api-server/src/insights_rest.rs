//! Customer analytics REST API endpoints: segmentation, churn, and LTV.

use axum::extract::State;
use axum::Json;
use bistro_core::CustomerRecord;
use bistro_predictive::{ChurnReport, LtvReport};
use bistro_segmentation::SegmentationReport;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::rest::{validate_batch, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerBatchRequest {
    pub customers: Vec<CustomerRecord>,
}

/// Segments, churn, and LTV computed against one evaluation instant.
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerInsightsResponse {
    pub segmentation: SegmentationReport,
    pub churn: ChurnReport,
    pub ltv: LtvReport,
}

/// POST /v1/customers/segments — RFM segmentation.
#[utoipa::path(
    post,
    path = "/v1/customers/segments",
    tag = "Customers",
    request_body = CustomerBatchRequest,
    responses(
        (status = 200, description = "Customers grouped into segments", body = SegmentationReport),
        (status = 400, description = "Invalid batch", body = crate::rest::ErrorResponse),
    )
)]
pub async fn handle_segments(
    State(state): State<AppState>,
    Json(request): Json<CustomerBatchRequest>,
) -> Result<Json<SegmentationReport>, ApiError> {
    validate_batch(request.customers.len(), state.max_batch_size, "customer")?;
    Ok(Json(state.segmentation.segment(&request.customers)))
}

/// POST /v1/customers/churn — Churn scoring, highest risk first.
#[utoipa::path(
    post,
    path = "/v1/customers/churn",
    tag = "Customers",
    request_body = CustomerBatchRequest,
    responses(
        (status = 200, description = "Churn predictions", body = ChurnReport),
        (status = 400, description = "Invalid batch", body = crate::rest::ErrorResponse),
    )
)]
pub async fn handle_churn(
    State(state): State<AppState>,
    Json(request): Json<CustomerBatchRequest>,
) -> Result<Json<ChurnReport>, ApiError> {
    validate_batch(request.customers.len(), state.max_batch_size, "customer")?;
    Ok(Json(state.churn.predict(&request.customers)))
}

/// POST /v1/customers/ltv — Lifetime-value projection, highest growth first.
#[utoipa::path(
    post,
    path = "/v1/customers/ltv",
    tag = "Customers",
    request_body = CustomerBatchRequest,
    responses(
        (status = 200, description = "LTV predictions", body = LtvReport),
        (status = 400, description = "Invalid batch", body = crate::rest::ErrorResponse),
    )
)]
pub async fn handle_ltv(
    State(state): State<AppState>,
    Json(request): Json<CustomerBatchRequest>,
) -> Result<Json<LtvReport>, ApiError> {
    validate_batch(request.customers.len(), state.max_batch_size, "customer")?;
    Ok(Json(state.ltv.predict(&request.customers)))
}

/// POST /v1/customers/insights — Segments, churn, and LTV in one pass.
#[utoipa::path(
    post,
    path = "/v1/customers/insights",
    tag = "Customers",
    request_body = CustomerBatchRequest,
    responses(
        (status = 200, description = "Full customer insights", body = CustomerInsightsResponse),
        (status = 400, description = "Invalid batch", body = crate::rest::ErrorResponse),
    )
)]
pub async fn handle_insights(
    State(state): State<AppState>,
    Json(request): Json<CustomerBatchRequest>,
) -> Result<Json<CustomerInsightsResponse>, ApiError> {
    validate_batch(request.customers.len(), state.max_batch_size, "customer")?;
    let now = Utc::now();
    let customers = &request.customers;
    Ok(Json(CustomerInsightsResponse {
        segmentation: state.segmentation.segment_at(customers, now),
        churn: state.churn.predict_at(customers, now),
        ltv: state.ltv.predict_at(customers, now),
    }))
}
