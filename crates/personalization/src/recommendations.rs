//! Content-based menu recommendations — rank catalog items by cosine
//! similarity between a customer profile embedding and item embeddings.

use std::sync::Arc;

use bistro_core::config::RecommendationConfig;
use bistro_core::{InsightsError, InsightsResult, MenuItemEmbeddingRecord, RejectedRecord};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::embedder::Embedder;
use crate::similarity::cosine_similarity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankOptions {
    /// Items must score strictly above this similarity.
    pub threshold: f64,
    pub top_k: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            top_k: 5,
        }
    }
}

impl From<&RecommendationConfig> for RankOptions {
    fn from(config: &RecommendationConfig) -> Self {
        Self {
            threshold: config.similarity_threshold,
            top_k: config.top_k,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankedItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub cuisine: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationOutcome {
    /// Most similar first.
    pub items: Vec<RankedItem>,
    /// Catalog items that could not be scored, with the reason.
    pub skipped: Vec<RejectedRecord>,
    pub generated_at: DateTime<Utc>,
}

/// Rank catalog items against a profile embedding.
///
/// Items without an embedding, or whose dimension differs from the profile's,
/// are skipped individually. Equal scores keep catalog order.
pub fn rank_by_similarity(
    profile: &[f32],
    items: &[MenuItemEmbeddingRecord],
    options: RankOptions,
) -> InsightsResult<RecommendationOutcome> {
    if profile.is_empty() {
        return Err(InsightsError::EmptyVector);
    }

    let mut scored = Vec::with_capacity(items.len());
    let mut skipped = Vec::new();

    for item in items {
        let Some(embedding) = item.embedding.as_deref() else {
            skipped.push(RejectedRecord::new(&item.id, "missing embedding"));
            continue;
        };
        match cosine_similarity(profile, embedding) {
            Ok(similarity) => {
                debug!(item_id = %item.id, similarity, "Item scored");
                if similarity > options.threshold {
                    scored.push(RankedItem {
                        id: item.id.clone(),
                        name: item.name.clone(),
                        category: item.category.clone(),
                        cuisine: item.cuisine.clone(),
                        similarity,
                    });
                }
            }
            Err(e) => {
                warn!(item_id = %item.id, error = %e, "Catalog item skipped");
                skipped.push(RejectedRecord::new(&item.id, e));
            }
        }
    }

    scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    scored.truncate(options.top_k);

    metrics::counter!("recommendations.items_returned").increment(scored.len() as u64);

    Ok(RecommendationOutcome {
        items: scored,
        skipped,
        generated_at: Utc::now(),
    })
}

/// Recommender that obtains the profile embedding (and any missing item
/// embeddings) from an [`Embedder`].
pub struct ContentRecommender {
    embedder: Arc<dyn Embedder>,
    options: RankOptions,
    concurrency: usize,
}

impl ContentRecommender {
    pub fn new(embedder: Arc<dyn Embedder>, config: &RecommendationConfig) -> Self {
        info!(
            provider = embedder.provider_name(),
            threshold = config.similarity_threshold,
            top_k = config.top_k,
            "Content recommender initialized"
        );
        Self {
            embedder,
            options: RankOptions::from(config),
            concurrency: config.embedding_concurrency.max(1),
        }
    }

    /// Recommend catalog items for a free-text customer profile.
    ///
    /// A failed profile embedding fails the request; a failed item embedding
    /// only skips that item.
    pub async fn recommend(
        &self,
        profile_text: &str,
        items: &[MenuItemEmbeddingRecord],
    ) -> InsightsResult<RecommendationOutcome> {
        let profile = self.embedder.embed(profile_text).await.map_err(|e| {
            warn!(error = %e, "Profile embedding failed");
            InsightsError::from(e)
        })?;
        self.recommend_for_embedding(&profile, items).await
    }

    /// Recommend catalog items for a precomputed profile embedding.
    pub async fn recommend_for_embedding(
        &self,
        profile: &[f32],
        items: &[MenuItemEmbeddingRecord],
    ) -> InsightsResult<RecommendationOutcome> {
        let (hydrated, mut failed) = self.hydrate_embeddings(items).await;
        let mut outcome = rank_by_similarity(profile, &hydrated, self.options)?;
        failed.append(&mut outcome.skipped);
        outcome.skipped = failed;
        Ok(outcome)
    }

    /// Fill in embeddings for items that lack one. Items whose embedding
    /// call fails are dropped and reported.
    async fn hydrate_embeddings(
        &self,
        items: &[MenuItemEmbeddingRecord],
    ) -> (Vec<MenuItemEmbeddingRecord>, Vec<RejectedRecord>) {
        let results: Vec<Result<MenuItemEmbeddingRecord, RejectedRecord>> = stream::iter(items.to_vec())
            .map(|item| async move {
                if item.embedding.is_some() {
                    return Ok(item);
                }
                match self.embedder.embed(&item.descriptor()).await {
                    Ok(embedding) => Ok(MenuItemEmbeddingRecord {
                        embedding: Some(embedding),
                        ..item
                    }),
                    Err(e) => {
                        warn!(item_id = %item.id, error = %e, "Item embedding unavailable");
                        Err(RejectedRecord::new(&item.id, format!("embedding unavailable: {e}")))
                    }
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut hydrated = Vec::with_capacity(results.len());
        let mut failed = Vec::new();
        for result in results {
            match result {
                Ok(item) => hydrated.push(item),
                Err(rejected) => failed.push(rejected),
            }
        }
        (hydrated, failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bistro_core::CollaboratorError;
    use std::collections::HashMap;

    fn item(id: &str, embedding: Option<Vec<f32>>) -> MenuItemEmbeddingRecord {
        MenuItemEmbeddingRecord {
            id: id.to_string(),
            name: format!("Dish {id}"),
            category: "Mains".to_string(),
            cuisine: "Italian".to_string(),
            ingredients: vec![],
            embedding,
        }
    }

    /// Fake embedder keyed by exact input text.
    struct FixedEmbedder {
        vectors: HashMap<String, Vec<f32>>,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, CollaboratorError> {
            self.vectors
                .get(text)
                .cloned()
                .ok_or_else(|| CollaboratorError::Http {
                    status: 500,
                    body: "unknown text".to_string(),
                })
        }

        fn provider_name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_filters_sorts_and_truncates() {
        let profile = vec![1.0, 0.0];
        let items = vec![
            item("low", Some(vec![0.5, 1.0])), // ~0.447
            item("mid", Some(vec![1.0, 0.8])), // ~0.781
            item("top", Some(vec![1.0, 0.1])), // ~0.995
            item("edge", Some(vec![3.0, 4.0])), // exactly 0.6, excluded
            item("ortho", Some(vec![0.0, 1.0])),
        ];
        let outcome = rank_by_similarity(&profile, &items, RankOptions::default()).unwrap();
        let ids: Vec<&str> = outcome.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "mid"]);
        assert!(outcome.items.iter().all(|i| i.similarity > 0.6));
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_at_most_top_k() {
        let profile = vec![1.0, 1.0];
        let items: Vec<_> = (0..8).map(|i| item(&format!("i{i}"), Some(vec![1.0, 1.0]))).collect();
        let outcome = rank_by_similarity(&profile, &items, RankOptions::default()).unwrap();
        assert_eq!(outcome.items.len(), 5);
        // Equal scores keep catalog order.
        assert_eq!(outcome.items[0].id, "i0");
        assert_eq!(outcome.items[4].id, "i4");
    }

    #[test]
    fn test_identical_embeddings_both_returned() {
        let profile = vec![0.2, 0.4, 0.9];
        let items = vec![
            item("twin-a", Some(profile.clone())),
            item("other", Some(vec![0.9, 0.1, 0.3])),
            item("twin-b", Some(profile.clone())),
        ];
        let outcome = rank_by_similarity(&profile, &items, RankOptions::default()).unwrap();
        let ids: Vec<&str> = outcome.items.iter().map(|i| i.id.as_str()).collect();
        assert!(ids.contains(&"twin-a"));
        assert!(ids.contains(&"twin-b"));
        assert!((outcome.items[0].similarity - 1.0).abs() < 1e-9);
        assert!((outcome.items[1].similarity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mismatched_and_missing_items_skipped() {
        let profile = vec![1.0, 0.0, 0.0];
        let items = vec![
            item("short", Some(vec![1.0, 0.0])),
            item("none", None),
            item("ok", Some(vec![1.0, 0.0, 0.0])),
            item("zero", Some(vec![0.0, 0.0, 0.0])),
        ];
        let outcome = rank_by_similarity(&profile, &items, RankOptions::default()).unwrap();
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].id, "ok");
        let skipped: Vec<&str> = outcome.skipped.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(skipped, vec!["short", "none"]);
        assert!(outcome.skipped[0].reason.contains("dimension mismatch"));
    }

    #[test]
    fn test_empty_profile_fails() {
        assert!(rank_by_similarity(&[], &[item("a", Some(vec![1.0]))], RankOptions::default()).is_err());
    }

    #[tokio::test]
    async fn test_recommend_embeds_profile_and_missing_items() {
        let pasta = item("pasta", None);
        let mut vectors = HashMap::new();
        vectors.insert("loves spicy noodles".to_string(), vec![1.0, 0.0]);
        vectors.insert(pasta.descriptor(), vec![0.9, 0.1]);
        let embedder = Arc::new(FixedEmbedder { vectors });

        let recommender = ContentRecommender::new(embedder, &RecommendationConfig::default());
        let items = vec![pasta, item("salad", Some(vec![0.0, 1.0])), item("mystery", None)];
        let outcome = recommender.recommend("loves spicy noodles", &items).await.unwrap();

        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].id, "pasta");
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].id, "mystery");
        assert!(outcome.skipped[0].reason.starts_with("embedding unavailable"));
    }

    #[tokio::test]
    async fn test_profile_embedding_failure_fails_request() {
        let embedder = Arc::new(FixedEmbedder {
            vectors: HashMap::new(),
        });
        let recommender = ContentRecommender::new(embedder, &RecommendationConfig::default());
        let err = recommender
            .recommend("unknown", &[item("a", Some(vec![1.0]))])
            .await
            .unwrap_err();
        assert!(matches!(err, InsightsError::Collaborator(_)));
    }

    #[tokio::test]
    async fn test_recommend_runs_on_spawned_task() {
        let pasta = item("pasta", None);
        let mut vectors = HashMap::new();
        vectors.insert("loves pasta".to_string(), vec![1.0, 0.0]);
        vectors.insert(pasta.descriptor(), vec![1.0, 0.1]);
        let recommender =
            ContentRecommender::new(Arc::new(FixedEmbedder { vectors }), &RecommendationConfig::default());
        let items = vec![pasta];

        let outcome = tokio::spawn(async move { recommender.recommend("loves pasta", &items).await })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome.items[0].id, "pasta");
    }
}
