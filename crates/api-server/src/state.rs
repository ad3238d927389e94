//! Shared application state: the scoring engines plus whichever external
//! collaborators are configured.

use std::sync::Arc;
use std::time::Instant;

use bistro_core::config::AppConfig;
use bistro_feedback::{FeedbackAnalyzer, FeedbackClassifier, HttpFeedbackClassifier};
use bistro_personalization::{ContentRecommender, Embedder, HttpEmbedder, RankOptions};
use bistro_predictive::{ChurnPredictor, LtvPredictor};
use bistro_segmentation::SegmentationEngine;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub node_id: String,
    pub start_time: Instant,
    pub max_batch_size: usize,
    pub segmentation: Arc<SegmentationEngine>,
    pub churn: Arc<ChurnPredictor>,
    pub ltv: Arc<LtvPredictor>,
    pub rank_options: RankOptions,
    /// Present only when an embedding provider is configured.
    pub recommender: Option<Arc<ContentRecommender>>,
    /// Present only when a text classifier is configured.
    pub feedback: Option<Arc<FeedbackAnalyzer>>,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        embedder: Option<Arc<dyn Embedder>>,
        classifier: Option<Arc<dyn FeedbackClassifier>>,
    ) -> Self {
        let recommender = embedder
            .map(|e| Arc::new(ContentRecommender::new(e, &config.recommendation)));
        let feedback = classifier.map(|c| {
            Arc::new(FeedbackAnalyzer::new(
                c,
                config.collaborators.classification_concurrency,
            ))
        });

        Self {
            node_id: config.node_id.clone(),
            start_time: Instant::now(),
            max_batch_size: config.api.max_batch_size,
            segmentation: Arc::new(SegmentationEngine::new()),
            churn: Arc::new(ChurnPredictor::new()),
            ltv: Arc::new(LtvPredictor::new()),
            rank_options: RankOptions::from(&config.recommendation),
            recommender,
            feedback,
        }
    }

    /// Build state with HTTP collaborators for every configured endpoint.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let collaborators = &config.collaborators;

        let embedder: Option<Arc<dyn Embedder>> = match &collaborators.embedding_url {
            Some(url) => Some(Arc::new(HttpEmbedder::new(url.clone(), collaborators)?)),
            None => {
                warn!("No embedding provider configured, text-based recommendations disabled");
                None
            }
        };
        let classifier: Option<Arc<dyn FeedbackClassifier>> = match &collaborators.classifier_url {
            Some(url) => Some(Arc::new(HttpFeedbackClassifier::new(url.clone(), collaborators)?)),
            None => {
                warn!("No feedback classifier configured, feedback analysis disabled");
                None
            }
        };

        info!(
            embedder = embedder.is_some(),
            classifier = classifier.is_some(),
            "Application state initialized"
        );
        Ok(Self::new(config, embedder, classifier))
    }
}
