//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bistro Insights API",
        version = "0.1.0",
        description = "Customer analytics for restaurant marketing.\n\nRFM segmentation, churn and lifetime-value scoring, embedding-based menu recommendations, and feedback sentiment aggregation.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Customers", description = "Segmentation, churn risk, and lifetime-value projection"),
        (name = "Recommendations", description = "Content-based menu recommendations"),
        (name = "Feedback", description = "Feedback classification and batch insights"),
        (name = "Operations", description = "Health, readiness, and liveness checks"),
    ),
    paths(
        // Customers
        crate::insights_rest::handle_segments,
        crate::insights_rest::handle_churn,
        crate::insights_rest::handle_ltv,
        crate::insights_rest::handle_insights,
        // Recommendations
        crate::recommend_rest::handle_recommend,
        // Feedback
        crate::feedback_rest::handle_analyze_feedback,
        // Operations
        crate::rest::health_check,
        crate::rest::readiness,
        crate::rest::liveness,
    ),
    components(schemas(
        // Customer records
        bistro_core::CustomerRecord,
        bistro_core::types::CustomerBehavior,
        bistro_core::types::CustomerEngagement,
        bistro_core::types::CustomerPreferences,
        bistro_core::types::CustomerMetrics,
        bistro_core::types::CustomerAcquisition,
        bistro_core::SegmentName,
        bistro_core::RejectedRecord,
        crate::insights_rest::CustomerBatchRequest,
        crate::insights_rest::CustomerInsightsResponse,
        // Segmentation
        bistro_segmentation::Segment,
        bistro_segmentation::SegmentationReport,
        bistro_segmentation::SegmentStrategy,
        bistro_segmentation::BudgetTier,
        // Churn and LTV
        bistro_predictive::ChurnRisk,
        bistro_predictive::churn::ChurnFactors,
        bistro_predictive::ChurnPrediction,
        bistro_predictive::churn::ChurnSummary,
        bistro_predictive::ChurnReport,
        bistro_predictive::GrowthTier,
        bistro_predictive::LtvPrediction,
        bistro_predictive::LtvReport,
        // Recommendations
        bistro_core::MenuItemEmbeddingRecord,
        bistro_personalization::RankedItem,
        bistro_personalization::RecommendationOutcome,
        crate::recommend_rest::RecommendationApiRequest,
        // Feedback
        bistro_feedback::FeedbackItem,
        bistro_feedback::Sentiment,
        bistro_feedback::Urgency,
        bistro_feedback::Classification,
        bistro_feedback::FeedbackAnalysis,
        bistro_feedback::SentimentDistribution,
        bistro_feedback::FeedbackInsights,
        bistro_feedback::FeedbackReport,
        crate::feedback_rest::FeedbackApiRequest,
        // REST error/health types
        crate::rest::ErrorResponse,
        crate::rest::HealthResponse,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/v1/customers/segments",
            "/v1/customers/churn",
            "/v1/customers/ltv",
            "/v1/customers/insights",
            "/v1/recommendations",
            "/v1/feedback/analyze",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
