//! Text-classification collaborator.

use async_trait::async_trait;
use bistro_core::config::CollaboratorConfig;
use bistro_core::{CollaboratorClient, CollaboratorError};
use serde::Serialize;
use tracing::info;

use crate::models::Classification;

/// Assigns a sentiment and issue categories to feedback text.
#[async_trait]
pub trait FeedbackClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification, CollaboratorError>;

    /// Provider name for metrics/logging.
    fn provider_name(&self) -> &str;
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

/// Classifier reached over HTTP: posts `{"text": ...}` and expects
/// `{"sentiment": "...", "categories": [...]}` back.
pub struct HttpFeedbackClassifier {
    client: CollaboratorClient,
}

impl HttpFeedbackClassifier {
    pub fn new(endpoint: impl Into<String>, config: &CollaboratorConfig) -> Result<Self, CollaboratorError> {
        let client = CollaboratorClient::new(endpoint, config)?;
        info!(endpoint = %client.endpoint(), "HTTP feedback classifier initialized");
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedbackClassifier for HttpFeedbackClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, CollaboratorError> {
        let classification: Classification = self.client.post_json(&ClassifyRequest { text }).await?;
        metrics::counter!(
            "collaborator.classifications",
            "sentiment" => format!("{:?}", classification.sentiment)
        )
        .increment(1);
        Ok(classification)
    }

    fn provider_name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    #[test]
    fn test_classification_wire_format() {
        let json = r#"{"sentiment": "negative", "categories": ["service", "wait time"]}"#;
        let c: Classification = serde_json::from_str(json).unwrap();
        assert_eq!(c.sentiment, Sentiment::Negative);
        assert_eq!(c.categories, vec!["service", "wait time"]);

        let bare: Classification = serde_json::from_str(r#"{"sentiment": "neutral"}"#).unwrap();
        assert!(bare.categories.is_empty());
    }

    #[tokio::test]
    async fn test_http_classifier_posts_text() {
        let app = Router::new().route(
            "/classify",
            post(|Json(body): Json<Value>| async move {
                let text = body["text"].as_str().unwrap_or_default().to_string();
                if text.contains("slow") {
                    Json(json!({ "sentiment": "negative", "categories": ["service"] }))
                } else {
                    Json(json!({ "sentiment": "positive" }))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let classifier =
            HttpFeedbackClassifier::new(format!("http://{addr}/classify"), &CollaboratorConfig::default())
                .unwrap();
        let negative = classifier.classify("slow service tonight").await.unwrap();
        assert_eq!(negative.sentiment, Sentiment::Negative);
        assert_eq!(negative.categories, vec!["service"]);

        let positive = classifier.classify("lovely").await.unwrap();
        assert_eq!(positive.sentiment, Sentiment::Positive);
        assert!(positive.categories.is_empty());
    }
}
