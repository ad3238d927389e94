//! Personalization engine — embedding similarity and content-based menu
//! recommendations.

pub mod embedder;
pub mod recommendations;
pub mod similarity;

pub use embedder::{Embedder, HttpEmbedder};
pub use recommendations::{
    rank_by_similarity, ContentRecommender, RankOptions, RankedItem, RecommendationOutcome,
};
pub use similarity::cosine_similarity;
