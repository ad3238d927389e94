use bistro_core::RejectedRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    pub id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn score(&self) -> f64 {
        match self {
            Sentiment::Positive => 1.0,
            Sentiment::Neutral => 0.0,
            Sentiment::Negative => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Classifier verdict for one piece of feedback text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Classification {
    pub sentiment: Sentiment,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAnalysis {
    pub id: String,
    pub customer_id: Option<String>,
    pub text: String,
    pub sentiment: Sentiment,
    pub categories: Vec<String>,
    pub urgency: Urgency,
}

/// Percentages of classified feedback, each rounded to one decimal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SentimentDistribution {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackInsights {
    /// Number of classified feedback items the insights cover.
    pub total_feedbacks: usize,
    pub sentiment_distribution: SentimentDistribution,
    /// Most frequent categories among negative feedback, at most five.
    pub top_issues: Vec<String>,
    pub urgent_feedbacks: usize,
    /// Mean of +1/0/-1 sentiment scores.
    pub average_sentiment: f64,
    /// Items the classifier could not process; excluded from every figure above.
    pub unclassified_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    pub analysis: Vec<FeedbackAnalysis>,
    pub insights: FeedbackInsights,
    pub unclassified: Vec<RejectedRecord>,
}
