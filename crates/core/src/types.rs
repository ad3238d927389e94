use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{InsightsError, InsightsResult};

/// One customer of one restaurant, as fetched by the caller.
///
/// Scoring inputs are optional on the wire so a malformed row can be
/// received and rejected on its own instead of failing the whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub behavior: CustomerBehavior,
    #[serde(default)]
    pub engagement: CustomerEngagement,
    #[serde(default)]
    pub preferences: CustomerPreferences,
    #[serde(default)]
    pub metrics: CustomerMetrics,
    #[serde(default)]
    pub acquisition: CustomerAcquisition,
    /// Assigned by segmentation; never read as input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<SegmentName>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBehavior {
    #[serde(default)]
    pub last_visit: Option<DateTime<Utc>>,
    /// Visits per month.
    #[serde(default)]
    pub frequency: Option<f64>,
    #[serde(default)]
    pub avg_spend: Option<f64>,
    #[serde(default)]
    pub total_spent: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerEngagement {
    #[serde(default)]
    pub email_opens: f64,
    #[serde(default)]
    pub social_interaction: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPreferences {
    #[serde(default)]
    pub cuisine: Vec<String>,
    #[serde(default)]
    pub dietary: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerMetrics {
    /// Previously recorded lifetime value, the baseline for growth potential.
    #[serde(default)]
    pub ltv: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAcquisition {
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Visit recency and spend inputs, validated without touching engagement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurchaseSnapshot {
    /// Whole days elapsed since the last visit.
    pub days_since_visit: i64,
    pub frequency: f64,
    pub avg_spend: f64,
}

/// Validated behavioral inputs for one customer at one evaluation instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorSnapshot {
    /// Whole days elapsed since the last visit.
    pub days_since_visit: i64,
    pub frequency: f64,
    pub avg_spend: f64,
    /// Email opens plus social interactions.
    pub engagement: f64,
}

impl CustomerRecord {
    /// Validate `lastVisit`, `frequency`, and `avgSpend` only.
    pub fn purchases_at(&self, now: DateTime<Utc>) -> InsightsResult<PurchaseSnapshot> {
        let last_visit = self
            .behavior
            .last_visit
            .ok_or_else(|| InsightsError::validation("behavior.lastVisit is missing"))?;
        if last_visit > now {
            return Err(InsightsError::validation(
                "behavior.lastVisit is in the future",
            ));
        }

        Ok(PurchaseSnapshot {
            days_since_visit: (now - last_visit).num_days(),
            frequency: non_negative(self.behavior.frequency, "behavior.frequency")?,
            avg_spend: non_negative(self.behavior.avg_spend, "behavior.avgSpend")?,
        })
    }

    /// Validate and extract the behavioral inputs used by the churn and LTV
    /// scorers, engagement counters included.
    pub fn behavior_at(&self, now: DateTime<Utc>) -> InsightsResult<BehaviorSnapshot> {
        let purchases = self.purchases_at(now)?;
        let email_opens = non_negative(Some(self.engagement.email_opens), "engagement.emailOpens")?;
        let social = non_negative(
            Some(self.engagement.social_interaction),
            "engagement.socialInteraction",
        )?;

        Ok(BehaviorSnapshot {
            days_since_visit: purchases.days_since_visit,
            frequency: purchases.frequency,
            avg_spend: purchases.avg_spend,
            engagement: email_opens + social,
        })
    }

    /// Whole 30-day months between acquisition and `now`.
    pub fn tenure_months_at(&self, now: DateTime<Utc>) -> InsightsResult<i64> {
        let acquired = self
            .acquisition
            .date
            .ok_or_else(|| InsightsError::validation("acquisition.date is missing"))?;
        if acquired > now {
            return Err(InsightsError::validation(
                "acquisition.date is in the future",
            ));
        }
        Ok((now - acquired).num_days() / 30)
    }

    /// Previously recorded LTV, if it is a usable baseline (finite and positive).
    pub fn baseline_ltv(&self) -> Option<f64> {
        self.metrics.ltv.filter(|v| v.is_finite() && *v > 0.0)
    }
}

fn non_negative(value: Option<f64>, field: &str) -> InsightsResult<f64> {
    match value {
        None => Err(InsightsError::validation(format!("{field} is missing"))),
        Some(v) if !v.is_finite() => Err(InsightsError::validation(format!(
            "{field} must be a finite number"
        ))),
        Some(v) if v < 0.0 => Err(InsightsError::validation(format!(
            "{field} must be non-negative"
        ))),
        Some(v) => Ok(v),
    }
}

/// RFM segment labels, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum SegmentName {
    #[serde(rename = "VIP Champions")]
    VipChampions,
    #[serde(rename = "Loyal Customers")]
    LoyalCustomers,
    #[serde(rename = "At Risk")]
    AtRisk,
    #[serde(rename = "New Customers")]
    NewCustomers,
    #[serde(rename = "Regular")]
    Regular,
}

impl SegmentName {
    pub const ALL: [SegmentName; 5] = [
        SegmentName::VipChampions,
        SegmentName::LoyalCustomers,
        SegmentName::AtRisk,
        SegmentName::NewCustomers,
        SegmentName::Regular,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SegmentName::VipChampions => "VIP Champions",
            SegmentName::LoyalCustomers => "Loyal Customers",
            SegmentName::AtRisk => "At Risk",
            SegmentName::NewCustomers => "New Customers",
            SegmentName::Regular => "Regular",
        }
    }
}

/// A catalog item with a text-embedding vector for content-based matching.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemEmbeddingRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Precomputed embedding; items without one are embedded on demand.
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

impl MenuItemEmbeddingRecord {
    /// Text submitted to the embedding provider when no vector is stored.
    pub fn descriptor(&self) -> String {
        let mut text = format!("{} ({})", self.name, self.category);
        if !self.cuisine.is_empty() {
            text.push_str(&format!(", {} cuisine", self.cuisine));
        }
        if !self.ingredients.is_empty() {
            text.push_str(&format!(", made with {}", self.ingredients.join(", ")));
        }
        text
    }
}

/// A batch item that was skipped, with the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RejectedRecord {
    pub id: String,
    pub reason: String,
}

impl RejectedRecord {
    pub fn new(id: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}
