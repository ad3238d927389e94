//! Lifetime-value projection from monthly value, churn-adjusted lifespan,
//! and tenure-based growth.

use std::cmp::Ordering;

use bistro_core::numeric::round_half_up;
use bistro_core::{CustomerRecord, InsightsError, InsightsResult, RejectedRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::churn::churn_score;

/// Longest lifespan projected for a customer with zero churn risk.
const MAX_LIFESPAN_MONTHS: f64 = 24.0;
/// Customers acquired more than this many months ago grow faster.
const TENURE_GROWTH_MONTHS: i64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum GrowthTier {
    High,
    Moderate,
    Stable,
    /// No positive recorded LTV to measure growth against.
    InsufficientBaseline,
}

impl GrowthTier {
    pub fn from_potential(potential: Option<f64>) -> Self {
        match potential {
            Some(p) if p > 50.0 => GrowthTier::High,
            Some(p) if p > 20.0 => GrowthTier::Moderate,
            Some(_) => GrowthTier::Stable,
            None => GrowthTier::InsufficientBaseline,
        }
    }

    pub fn recommendations(&self) -> Vec<String> {
        let actions: &[&str] = match self {
            GrowthTier::High => &[
                "Invest in premium loyalty perks",
                "Offer exclusive tasting menus",
                "Prioritize for VIP upgrade",
            ],
            GrowthTier::Moderate => &[
                "Encourage visit frequency with targeted offers",
                "Upsell add-ons and desserts",
                "Promote catering and group dining",
            ],
            GrowthTier::Stable => &[
                "Focus on retention and satisfaction",
                "Send periodic appreciation rewards",
                "Maintain consistent service quality",
            ],
            GrowthTier::InsufficientBaseline => &[
                "Record spend history to establish a baseline",
                "Encourage a return visit with a welcome offer",
            ],
        };
        actions.iter().map(|a| a.to_string()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LtvPrediction {
    pub customer_id: String,
    #[serde(rename = "currentLTV")]
    pub current_ltv: f64,
    #[serde(rename = "predictedLTV")]
    pub predicted_ltv: f64,
    /// Percent growth over the recorded LTV; `None` without a usable baseline.
    #[serde(rename = "ltvGrowthPotential")]
    pub ltv_growth_potential: Option<f64>,
    pub growth_tier: GrowthTier,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LtvReport {
    /// Highest growth potential first; unmeasurable predictions last.
    pub predictions: Vec<LtvPrediction>,
    pub rejected: Vec<RejectedRecord>,
}

/// Stateless LTV predictor.
pub struct LtvPredictor;

impl LtvPredictor {
    pub fn new() -> Self {
        info!("LTV predictor initialized");
        Self
    }

    pub fn predict_customer_at(
        &self,
        customer: &CustomerRecord,
        now: DateTime<Utc>,
    ) -> InsightsResult<LtvPrediction> {
        let snapshot = customer.behavior_at(now)?;
        let tenure_months = customer.tenure_months_at(now)?;

        let monthly_value = snapshot.frequency * snapshot.avg_spend;
        let lifespan_months = (1.0 - churn_score(&snapshot)) * MAX_LIFESPAN_MONTHS;
        let growth_factor = if tenure_months > TENURE_GROWTH_MONTHS {
            1.2
        } else {
            1.1
        };
        let predicted_ltv = round_half_up(monthly_value * lifespan_months * growth_factor);
        if !predicted_ltv.is_finite() {
            return Err(InsightsError::validation(
                "projected LTV is not a finite number",
            ));
        }

        let baseline = customer.baseline_ltv();
        let ltv_growth_potential =
            baseline.map(|current| round_half_up((predicted_ltv - current) / current * 100.0));
        if ltv_growth_potential.is_some_and(|g| !g.is_finite()) {
            return Err(InsightsError::validation(
                "LTV growth potential is not a finite number",
            ));
        }
        let growth_tier = GrowthTier::from_potential(ltv_growth_potential);

        debug!(
            customer_id = %customer.id,
            predicted_ltv,
            growth = ?ltv_growth_potential,
            "LTV projected"
        );

        Ok(LtvPrediction {
            customer_id: customer.id.clone(),
            current_ltv: customer.metrics.ltv.unwrap_or(0.0),
            predicted_ltv,
            ltv_growth_potential,
            growth_tier,
            recommendations: growth_tier.recommendations(),
        })
    }

    pub fn predict(&self, customers: &[CustomerRecord]) -> LtvReport {
        self.predict_at(customers, Utc::now())
    }

    pub fn predict_at(&self, customers: &[CustomerRecord], now: DateTime<Utc>) -> LtvReport {
        let mut predictions = Vec::with_capacity(customers.len());
        let mut rejected = Vec::new();

        for customer in customers {
            match self.predict_customer_at(customer, now) {
                Ok(prediction) => predictions.push(prediction),
                Err(e) => {
                    warn!(customer_id = %customer.id, error = %e, "Customer rejected from LTV prediction");
                    rejected.push(RejectedRecord::new(&customer.id, e));
                }
            }
        }

        predictions.sort_by(|a, b| by_growth_desc(a.ltv_growth_potential, b.ltv_growth_potential));

        metrics::counter!("insights.rejected_records").increment(rejected.len() as u64);
        info!(
            predicted = predictions.len(),
            rejected = rejected.len(),
            "LTV prediction complete"
        );

        LtvReport {
            predictions,
            rejected,
        }
    }
}

impl Default for LtvPredictor {
    fn default() -> Self {
        Self::new()
    }
}

fn by_growth_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
