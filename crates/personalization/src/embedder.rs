//! Text-embedding collaborator.

use async_trait::async_trait;
use bistro_core::config::CollaboratorConfig;
use bistro_core::{CollaboratorClient, CollaboratorError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Turns free text into a fixed-length embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CollaboratorError>;

    /// Provider name for metrics/logging.
    fn provider_name(&self) -> &str;
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// Embedding provider reached over HTTP: posts `{"input": text}` and
/// expects `{"embedding": [...]}` back.
pub struct HttpEmbedder {
    client: CollaboratorClient,
}

impl HttpEmbedder {
    pub fn new(endpoint: impl Into<String>, config: &CollaboratorConfig) -> Result<Self, CollaboratorError> {
        let client = CollaboratorClient::new(endpoint, config)?;
        info!(endpoint = %client.endpoint(), "HTTP embedder initialized");
        Ok(Self { client })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CollaboratorError> {
        debug!(chars = text.len(), "Requesting embedding");
        let response: EmbedResponse = self.client.post_json(&EmbedRequest { input: text }).await?;
        if response.embedding.is_empty() {
            return Err(CollaboratorError::InvalidResponse(
                "embedding provider returned an empty vector".to_string(),
            ));
        }
        metrics::counter!("collaborator.embeddings").increment(1);
        Ok(response.embedding)
    }

    fn provider_name(&self) -> &str {
        "http"
    }
}
