//! Content-based menu recommendation endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bistro_core::MenuItemEmbeddingRecord;
use bistro_personalization::{rank_by_similarity, RecommendationOutcome};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::rest::{api_error, engine_error, validate_batch, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationApiRequest {
    /// Free-text customer profile, embedded by the configured provider.
    #[serde(default)]
    pub profile_text: Option<String>,
    /// Precomputed profile embedding; takes precedence over `profileText`.
    #[serde(default)]
    pub profile_embedding: Option<Vec<f32>>,
    pub items: Vec<MenuItemEmbeddingRecord>,
}

/// POST /v1/recommendations — Rank catalog items for a customer profile.
#[utoipa::path(
    post,
    path = "/v1/recommendations",
    tag = "Recommendations",
    request_body = RecommendationApiRequest,
    responses(
        (status = 200, description = "Top matching items", body = RecommendationOutcome),
        (status = 400, description = "Invalid request", body = crate::rest::ErrorResponse),
        (status = 502, description = "Embedding provider failed", body = crate::rest::ErrorResponse),
        (status = 503, description = "No embedding provider configured", body = crate::rest::ErrorResponse),
    )
)]
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationApiRequest>,
) -> Result<Json<RecommendationOutcome>, ApiError> {
    validate_batch(request.items.len(), state.max_batch_size, "catalog item")?;

    let result = match (&request.profile_embedding, &request.profile_text, &state.recommender) {
        (Some(embedding), _, Some(recommender)) => {
            recommender.recommend_for_embedding(embedding, &request.items).await
        }
        // Without a provider, only items that already carry embeddings can be ranked.
        (Some(embedding), _, None) => rank_by_similarity(embedding, &request.items, state.rank_options),
        (None, Some(text), Some(recommender)) => recommender.recommend(text, &request.items).await,
        (None, Some(_), None) => {
            return Err(api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "embedding_provider_unavailable",
                "no embedding provider is configured; send profileEmbedding instead",
            ))
        }
        (None, None, _) => {
            metrics::counter!("api.validation_errors").increment(1);
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                "either profileText or profileEmbedding is required",
            ));
        }
    };

    result
        .map(Json)
        .map_err(|e| engine_error(e, "recommendation_failed"))
}
