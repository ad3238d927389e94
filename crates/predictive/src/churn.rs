//! Churn scoring: a weighted additive score over recency, frequency,
//! engagement, and spend, bucketed into low/medium/high risk.

use bistro_core::{BehaviorSnapshot, CustomerRecord, InsightsResult, RejectedRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChurnRisk {
    Low,
    Medium,
    High,
}

impl ChurnRisk {
    /// Buckets are closed at their lower bound: 0.7 is high, 0.4 is medium.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            ChurnRisk::High
        } else if score >= 0.4 {
            ChurnRisk::Medium
        } else {
            ChurnRisk::Low
        }
    }

    pub fn recommendations(&self) -> Vec<String> {
        let actions: &[&str] = match self {
            ChurnRisk::High => &[
                "Send a personal win-back offer within 48 hours",
                "Offer a complimentary dish on the next visit",
                "Have the manager reach out directly",
                "Ask what kept them away with a short survey",
            ],
            ChurnRisk::Medium => &[
                "Send a promotion on their favorite dishes",
                "Invite them to an upcoming tasting event",
                "Increase email touchpoints",
            ],
            ChurnRisk::Low => &[
                "Maintain regular communication",
                "Enroll in loyalty rewards",
                "Share new menu updates",
            ],
        };
        actions.iter().map(|a| a.to_string()).collect()
    }
}

/// Contribution of each factor to the final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChurnFactors {
    pub recency: f64,
    pub frequency: f64,
    pub engagement: f64,
    pub spend: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChurnPrediction {
    pub customer_id: String,
    pub churn_score: f64,
    pub churn_risk: ChurnRisk,
    pub factors: ChurnFactors,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChurnSummary {
    pub high_risk: usize,
    pub medium_risk: usize,
    pub low_risk: usize,
    pub total_customers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChurnReport {
    /// Highest risk first.
    pub predictions: Vec<ChurnPrediction>,
    pub summary: ChurnSummary,
    pub rejected: Vec<RejectedRecord>,
}

// Factor weights in tenths, so sums land exactly on the bucket thresholds.
fn factor_points(snapshot: &BehaviorSnapshot) -> [u8; 4] {
    let recency = match snapshot.days_since_visit {
        d if d > 60 => 4,
        d if d > 30 => 2,
        d if d > 14 => 1,
        _ => 0,
    };
    let frequency = match snapshot.frequency {
        f if f < 1.0 => 3,
        f if f < 2.0 => 2,
        f if f < 4.0 => 1,
        _ => 0,
    };
    let engagement = match snapshot.engagement {
        e if e < 2.0 => 2,
        e if e < 5.0 => 1,
        _ => 0,
    };
    let spend = if snapshot.avg_spend < 500.0 { 1 } else { 0 };
    [recency, frequency, engagement, spend]
}

fn tenths(points: u8) -> f64 {
    f64::from(points) / 10.0
}

/// Churn score in `[0, 1]`.
pub fn churn_score(snapshot: &BehaviorSnapshot) -> f64 {
    let total: u8 = factor_points(snapshot).iter().sum();
    tenths(total.min(10))
}

/// Stateless churn predictor.
pub struct ChurnPredictor;

impl ChurnPredictor {
    pub fn new() -> Self {
        info!("Churn predictor initialized");
        Self
    }

    pub fn score_customer_at(
        &self,
        customer: &CustomerRecord,
        now: DateTime<Utc>,
    ) -> InsightsResult<ChurnPrediction> {
        let snapshot = customer.behavior_at(now)?;
        let [recency, frequency, engagement, spend] = factor_points(&snapshot);
        let churn_score = churn_score(&snapshot);
        let churn_risk = ChurnRisk::from_score(churn_score);

        debug!(
            customer_id = %customer.id,
            score = churn_score,
            risk = ?churn_risk,
            "Churn scored"
        );

        Ok(ChurnPrediction {
            customer_id: customer.id.clone(),
            churn_score,
            churn_risk,
            factors: ChurnFactors {
                recency: tenths(recency),
                frequency: tenths(frequency),
                engagement: tenths(engagement),
                spend: tenths(spend),
            },
            recommendations: churn_risk.recommendations(),
        })
    }

    pub fn predict(&self, customers: &[CustomerRecord]) -> ChurnReport {
        self.predict_at(customers, Utc::now())
    }

    /// Score every customer, highest churn score first. Invalid records are
    /// rejected individually and excluded from the summary.
    pub fn predict_at(&self, customers: &[CustomerRecord], now: DateTime<Utc>) -> ChurnReport {
        let mut predictions = Vec::with_capacity(customers.len());
        let mut rejected = Vec::new();

        for customer in customers {
            match self.score_customer_at(customer, now) {
                Ok(prediction) => predictions.push(prediction),
                Err(e) => {
                    warn!(customer_id = %customer.id, error = %e, "Customer rejected from churn scoring");
                    rejected.push(RejectedRecord::new(&customer.id, e));
                }
            }
        }

        predictions.sort_by(|a, b| b.churn_score.total_cmp(&a.churn_score));

        let mut summary = ChurnSummary {
            total_customers: predictions.len(),
            ..Default::default()
        };
        for p in &predictions {
            match p.churn_risk {
                ChurnRisk::High => summary.high_risk += 1,
                ChurnRisk::Medium => summary.medium_risk += 1,
                ChurnRisk::Low => summary.low_risk += 1,
            }
        }

        metrics::counter!("insights.churn.high_risk").increment(summary.high_risk as u64);
        metrics::counter!("insights.rejected_records").increment(rejected.len() as u64);
        info!(
            scored = summary.total_customers,
            high = summary.high_risk,
            rejected = rejected.len(),
            "Churn prediction complete"
        );

        ChurnReport {
            predictions,
            summary,
            rejected,
        }
    }
}

impl Default for ChurnPredictor {
    fn default() -> Self {
        Self::new()
    }
}
