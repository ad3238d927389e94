use serde::Deserialize;

use crate::error::{InsightsError, InsightsResult};

/// Root application configuration. Loaded from environment variables
/// with the prefix `BISTRO_INSIGHTS__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub recommendation: RecommendationConfig,
    #[serde(default)]
    pub collaborators: CollaboratorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Largest number of records accepted in a single request body.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// Default functions
fn default_node_id() -> String {
    "insights-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_max_batch_size() -> usize {
    10_000
}
fn default_metrics_enabled() -> bool {
    true
}
fn default_metrics_port() -> u16 {
    9091
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            max_batch_size: default_max_batch_size(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            port: default_metrics_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            recommendation: RecommendationConfig::default(),
            collaborators: CollaboratorConfig::default(),
        }
    }
}

// ─── Recommendation Config ──────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConfig {
    /// Items must score strictly above this cosine similarity to qualify.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Concurrent embedding calls for catalog items without a stored vector.
    #[serde(default = "default_embedding_concurrency")]
    pub embedding_concurrency: usize,
}

fn default_similarity_threshold() -> f64 { 0.6 }
fn default_top_k() -> usize { 5 }
fn default_embedding_concurrency() -> usize { 8 }

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            top_k: default_top_k(),
            embedding_concurrency: default_embedding_concurrency(),
        }
    }
}

// ─── Collaborator Config ────────────────────────────────────────────────────

/// Endpoints for the embedding and text-classification services. Either may
/// be left unset, in which case the dependent API endpoints report 503.
#[derive(Debug, Clone, Deserialize)]
pub struct CollaboratorConfig {
    #[serde(default)]
    pub embedding_url: Option<String>,
    #[serde(default)]
    pub classifier_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_collaborator_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_collaborator_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_classification_concurrency")]
    pub classification_concurrency: usize,
}

fn default_collaborator_timeout_ms() -> u64 { 10_000 }
fn default_collaborator_max_retries() -> usize { 3 }
fn default_classification_concurrency() -> usize { 8 }

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            embedding_url: None,
            classifier_url: None,
            api_key: None,
            timeout_ms: default_collaborator_timeout_ms(),
            max_retries: default_collaborator_max_retries(),
            classification_concurrency: default_classification_concurrency(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> InsightsResult<Self> {
        Self::from_environment(config::Environment::with_prefix("BISTRO_INSIGHTS"))
    }

    fn from_environment(source: config::Environment) -> InsightsResult<Self> {
        config::Config::builder()
            .add_source(source.separator("__").try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize::<Self>())
            .map_err(|e| InsightsError::Config(e.to_string()))
    }
}
