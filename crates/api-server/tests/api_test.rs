//! End-to-end tests for the REST surface, driven through the router with
//! in-process fake collaborators.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use bistro_api::{router, AppState};
use bistro_core::config::AppConfig;
use bistro_core::CollaboratorError;
use bistro_feedback::{Classification, FeedbackClassifier, Sentiment};
use bistro_personalization::Embedder;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

struct FixedEmbedder(Vec<f32>);

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, CollaboratorError> {
        Ok(self.0.clone())
    }

    fn provider_name(&self) -> &str {
        "fixed"
    }
}

/// Negative for anything mentioning "cold" or "slow", fails on "boom".
struct KeywordClassifier;

#[async_trait]
impl FeedbackClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, CollaboratorError> {
        if text.contains("boom") {
            return Err(CollaboratorError::Timeout);
        }
        let mut categories = Vec::new();
        if text.contains("cold") {
            categories.push("food quality".to_string());
        }
        if text.contains("slow") {
            categories.push("Service".to_string());
        }
        let sentiment = if categories.is_empty() {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        };
        Ok(Classification {
            sentiment,
            categories,
        })
    }

    fn provider_name(&self) -> &str {
        "keyword"
    }
}

fn app_without_collaborators() -> Router {
    router(AppState::new(&AppConfig::default(), None, None))
}

fn app_with_collaborators() -> Router {
    router(AppState::new(
        &AppConfig::default(),
        Some(Arc::new(FixedEmbedder(vec![1.0, 0.0]))),
        Some(Arc::new(KeywordClassifier)),
    ))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).to_rfc3339()
}

fn customers() -> Value {
    json!([
        {
            "id": "vip",
            "name": "Ana",
            "behavior": { "lastVisit": days_ago(2), "frequency": 10.0, "avgSpend": 2000.0, "totalSpent": 48000.0 },
            "engagement": { "emailOpens": 8.0, "socialInteraction": 3.0 },
            "metrics": { "ltv": 40000.0 },
            "acquisition": { "date": days_ago(400) }
        },
        {
            "id": "lapsed",
            "name": "Bo",
            "behavior": { "lastVisit": days_ago(90), "frequency": 0.5, "avgSpend": 100.0, "totalSpent": 600.0 },
            "engagement": { "emailOpens": 0.0, "socialInteraction": 1.0 },
            "metrics": { "ltv": 500.0 },
            "acquisition": { "date": days_ago(700) }
        },
        {
            "id": "broken",
            "behavior": { "frequency": 3.0, "avgSpend": 50.0 }
        }
    ])
}

#[tokio::test]
async fn health_reports_collaborator_availability() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app_without_collaborators().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["recommender_enabled"], false);
    assert_eq!(body["feedback_enabled"], false);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();
    let response = app_without_collaborators().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn segments_group_customers_and_default_broken_rows() {
    let (status, body) = post_json(
        app_without_collaborators(),
        "/v1/customers/segments",
        json!({ "customers": customers() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCustomers"], 3);

    let segments = body["segments"].as_array().unwrap();
    let names: Vec<&str> = segments.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["VIP Champions", "At Risk", "Regular"]);
    assert_eq!(segments[2]["customers"][0]["id"], "broken");
    assert_eq!(segments[0]["customers"][0]["segment"], "VIP Champions");
}

#[tokio::test]
async fn churn_sorts_by_risk_and_rejects_invalid_rows() {
    let (status, body) = post_json(
        app_without_collaborators(),
        "/v1/customers/churn",
        json!({ "customers": customers() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0]["customerId"], "lapsed");
    assert_eq!(predictions[0]["churnRisk"], "high");
    assert_eq!(predictions[0]["churnScore"], 1.0);
    assert_eq!(body["summary"]["highRisk"], 1);
    assert_eq!(body["rejected"][0]["id"], "broken");
}

#[tokio::test]
async fn insights_combine_all_three_reports() {
    let (status, body) = post_json(
        app_without_collaborators(),
        "/v1/customers/insights",
        json!({ "customers": customers() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["segmentation"]["totalCustomers"], 3);
    assert_eq!(body["churn"]["predictions"].as_array().unwrap().len(), 2);
    assert_eq!(body["ltv"]["predictions"].as_array().unwrap().len(), 2);
    assert_eq!(body["ltv"]["rejected"][0]["id"], "broken");
}

#[tokio::test]
async fn empty_batches_yield_empty_reports() {
    let (status, body) = post_json(
        app_without_collaborators(),
        "/v1/customers/segments",
        json!({ "customers": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["segments"], json!([]));
    assert_eq!(body["totalCustomers"], 0);

    let (status, body) = post_json(
        app_without_collaborators(),
        "/v1/customers/ltv",
        json!({ "customers": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predictions"], json!([]));

    let (status, body) = post_json(
        app_with_collaborators(),
        "/v1/feedback/analyze",
        json!({ "feedbacks": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["insights"]["totalFeedbacks"], 0);
    assert_eq!(body["insights"]["averageSentiment"], 0.0);
}

#[tokio::test]
async fn oversized_batch_is_rejected() {
    let mut config = AppConfig::default();
    config.api.max_batch_size = 1;
    let app = router(AppState::new(&config, None, None));
    let (status, body) = post_json(
        app,
        "/v1/customers/churn",
        json!({ "customers": [{ "id": "a" }, { "id": "b" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn recommendations_rank_precomputed_embeddings_without_provider() {
    let (status, body) = post_json(
        app_without_collaborators(),
        "/v1/recommendations",
        json!({
            "profileEmbedding": [1.0, 0.0],
            "items": [
                { "id": "a", "name": "Pad Thai", "category": "Mains", "cuisine": "Thai", "embedding": [1.0, 0.0] },
                { "id": "b", "name": "Tiramisu", "category": "Dessert", "cuisine": "Italian", "embedding": [0.0, 1.0] },
                { "id": "c", "name": "Pho", "category": "Mains", "cuisine": "Vietnamese" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "a");
    assert_eq!(body["skipped"][0]["id"], "c");
}

#[tokio::test]
async fn text_recommendations_need_a_provider() {
    let request = json!({
        "profileText": "loves spicy noodles",
        "items": [{ "id": "a", "name": "Pad Thai", "category": "Mains", "cuisine": "Thai", "embedding": [1.0, 0.0] }]
    });

    let (status, body) =
        post_json(app_without_collaborators(), "/v1/recommendations", request.clone()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "embedding_provider_unavailable");

    let (status, body) = post_json(app_with_collaborators(), "/v1/recommendations", request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["id"], "a");
}

#[tokio::test]
async fn recommendations_reject_empty_profile_embedding() {
    let (status, body) = post_json(
        app_without_collaborators(),
        "/v1/recommendations",
        json!({
            "profileEmbedding": [],
            "items": [{ "id": "a", "name": "Pad Thai", "category": "Mains", "cuisine": "Thai", "embedding": [1.0, 0.0] }]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_embedding");
}

#[tokio::test]
async fn feedback_analysis_reports_partial_failures() {
    let (status, body) = post_json(
        app_with_collaborators(),
        "/v1/feedback/analyze",
        json!({
            "feedbacks": [
                { "id": "f1", "customerId": "c1", "text": "Lovely evening" },
                { "id": "f2", "text": "Soup was cold and service slow" },
                { "id": "f3", "text": "boom" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"].as_array().unwrap().len(), 2);
    assert_eq!(body["analysis"][1]["urgency"], "high");
    assert_eq!(body["insights"]["totalFeedbacks"], 2);
    assert_eq!(body["insights"]["urgentFeedbacks"], 1);
    assert_eq!(body["insights"]["unclassifiedCount"], 1);
    assert_eq!(body["unclassified"][0]["id"], "f3");
}

#[tokio::test]
async fn feedback_without_classifier_is_unavailable() {
    let (status, body) = post_json(
        app_without_collaborators(),
        "/v1/feedback/analyze",
        json!({ "feedbacks": [{ "id": "f1", "text": "Great" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "classifier_unavailable");
}
