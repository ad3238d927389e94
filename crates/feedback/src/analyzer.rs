//! Feedback analyzer: classifies each item through the collaborator, escalates
//! urgency, and aggregates batch-level insights.

use std::collections::HashMap;
use std::sync::Arc;

use bistro_core::numeric::round_to;
use bistro_core::RejectedRecord;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::classifier::FeedbackClassifier;
use crate::models::*;

const TOP_ISSUES: usize = 5;

/// Negative feedback about service is escalated above other negative feedback.
pub fn urgency_for(classification: &Classification) -> Urgency {
    let about_service = classification
        .categories
        .iter()
        .any(|c| c.to_lowercase().contains("service"));
    match classification.sentiment {
        Sentiment::Negative if about_service => Urgency::High,
        Sentiment::Negative => Urgency::Medium,
        _ => Urgency::Low,
    }
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_to(count as f64 / total as f64 * 100.0, 1)
    }
}

/// Aggregate classified feedback into batch insights.
pub fn summarize(analysis: &[FeedbackAnalysis], unclassified_count: usize) -> FeedbackInsights {
    let total = analysis.len();
    let count_of = |s: Sentiment| analysis.iter().filter(|a| a.sentiment == s).count();

    let mut issue_counts: HashMap<&str, usize> = HashMap::new();
    for a in analysis.iter().filter(|a| a.sentiment == Sentiment::Negative) {
        for category in &a.categories {
            *issue_counts.entry(category.as_str()).or_insert(0) += 1;
        }
    }
    let mut issues: Vec<(&str, usize)> = issue_counts.into_iter().collect();
    issues.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let average_sentiment = if total == 0 {
        0.0
    } else {
        analysis.iter().map(|a| a.sentiment.score()).sum::<f64>() / total as f64
    };

    FeedbackInsights {
        total_feedbacks: total,
        sentiment_distribution: SentimentDistribution {
            positive: percent(count_of(Sentiment::Positive), total),
            negative: percent(count_of(Sentiment::Negative), total),
            neutral: percent(count_of(Sentiment::Neutral), total),
        },
        top_issues: issues
            .into_iter()
            .take(TOP_ISSUES)
            .map(|(name, _)| name.to_string())
            .collect(),
        urgent_feedbacks: analysis.iter().filter(|a| a.urgency == Urgency::High).count(),
        average_sentiment,
        unclassified_count,
    }
}

pub struct FeedbackAnalyzer {
    classifier: Arc<dyn FeedbackClassifier>,
    concurrency: usize,
}

impl FeedbackAnalyzer {
    pub fn new(classifier: Arc<dyn FeedbackClassifier>, concurrency: usize) -> Self {
        info!(
            provider = classifier.provider_name(),
            concurrency, "Feedback analyzer initialized"
        );
        Self {
            classifier,
            concurrency: concurrency.max(1),
        }
    }

    /// Classify every item and aggregate the results. Items the classifier
    /// cannot process are reported in `unclassified` and left out of the
    /// insights rather than failing the batch.
    pub async fn analyze(&self, items: &[FeedbackItem]) -> FeedbackReport {
        // Owned items keep the buffered futures `Send` for axum handlers.
        let results: Vec<Result<FeedbackAnalysis, RejectedRecord>> = stream::iter(items.to_vec())
            .map(|item| async move { self.analyze_one(&item).await })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut analysis = Vec::with_capacity(results.len());
        let mut unclassified = Vec::new();
        for result in results {
            match result {
                Ok(a) => analysis.push(a),
                Err(rejected) => unclassified.push(rejected),
            }
        }

        let insights = summarize(&analysis, unclassified.len());

        metrics::counter!("feedback.unclassified").increment(unclassified.len() as u64);
        info!(
            classified = analysis.len(),
            unclassified = unclassified.len(),
            urgent = insights.urgent_feedbacks,
            "Feedback analysis complete"
        );

        FeedbackReport {
            analysis,
            insights,
            unclassified,
        }
    }

    async fn analyze_one(&self, item: &FeedbackItem) -> Result<FeedbackAnalysis, RejectedRecord> {
        if item.text.trim().is_empty() {
            return Err(RejectedRecord::new(&item.id, "feedback text is empty"));
        }

        let classification = self.classifier.classify(&item.text).await.map_err(|e| {
            warn!(feedback_id = %item.id, error = %e, "Feedback classification unavailable");
            RejectedRecord::new(&item.id, format!("classification unavailable: {e}"))
        })?;

        let urgency = urgency_for(&classification);
        debug!(feedback_id = %item.id, sentiment = ?classification.sentiment, urgency = ?urgency, "Feedback classified");

        Ok(FeedbackAnalysis {
            id: item.id.clone(),
            customer_id: item.customer_id.clone(),
            text: item.text.clone(),
            sentiment: classification.sentiment,
            categories: classification.categories,
            urgency,
        })
    }
}
