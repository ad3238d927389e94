//! Core segmentation engine — assigns each customer to exactly one RFM
//! segment using an ordered rule list.

use bistro_core::{CustomerRecord, PurchaseSnapshot, SegmentName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::playbook::{self, SegmentStrategy};

/// Recency (days), frequency (visits/month), monetary (average spend).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RfmScores {
    pub recency_days: i64,
    pub frequency: f64,
    pub monetary: f64,
}

impl From<PurchaseSnapshot> for RfmScores {
    fn from(snapshot: PurchaseSnapshot) -> Self {
        Self {
            recency_days: snapshot.days_since_visit,
            frequency: snapshot.frequency,
            monetary: snapshot.avg_spend,
        }
    }
}

/// Apply the rule list in order; the first match wins. Customers without
/// usable RFM inputs land in `Regular`.
pub fn classify_rfm(scores: Option<&RfmScores>) -> SegmentName {
    match scores {
        Some(s) if s.recency_days <= 7 && s.frequency >= 8.0 && s.monetary >= 1500.0 => {
            SegmentName::VipChampions
        }
        Some(s) if s.recency_days <= 14 && s.frequency >= 4.0 && s.monetary >= 1000.0 => {
            SegmentName::LoyalCustomers
        }
        Some(s) if s.recency_days > 30 && s.frequency < 2.0 => SegmentName::AtRisk,
        Some(s) if s.recency_days <= 30 && s.frequency < 2.0 && s.monetary < 800.0 => {
            SegmentName::NewCustomers
        }
        _ => SegmentName::Regular,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub name: SegmentName,
    pub customers: Vec<CustomerRecord>,
    pub size: usize,
    pub characteristics: Vec<String>,
    pub strategy: SegmentStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationReport {
    pub segments: Vec<Segment>,
    pub total_customers: usize,
    pub generated_at: DateTime<Utc>,
}

/// Stateless RFM segmentation over a caller-supplied customer snapshot.
pub struct SegmentationEngine;

impl SegmentationEngine {
    pub fn new() -> Self {
        info!("Segmentation engine initialized");
        Self
    }

    pub fn segment(&self, customers: &[CustomerRecord]) -> SegmentationReport {
        self.segment_at(customers, Utc::now())
    }

    /// Group customers into segments as of `now`. Segments are returned in
    /// display order and empty segments are omitted.
    pub fn segment_at(&self, customers: &[CustomerRecord], now: DateTime<Utc>) -> SegmentationReport {
        let mut buckets: Vec<Vec<CustomerRecord>> = vec![Vec::new(); SegmentName::ALL.len()];

        for customer in customers {
            let scores = customer.purchases_at(now).ok().map(RfmScores::from);
            let name = classify_rfm(scores.as_ref());
            debug!(customer_id = %customer.id, segment = name.display_name(), "Customer classified");

            let mut assigned = customer.clone();
            assigned.segment = Some(name);
            buckets[name as usize].push(assigned);
        }

        let segments: Vec<Segment> = SegmentName::ALL
            .into_iter()
            .zip(buckets)
            .filter(|(_, members)| !members.is_empty())
            .map(|(name, members)| Segment {
                name,
                size: members.len(),
                customers: members,
                characteristics: playbook::characteristics(name),
                strategy: playbook::strategy(name),
            })
            .collect();

        metrics::counter!("insights.segments.customers").increment(customers.len() as u64);
        info!(
            customers = customers.len(),
            segments = segments.len(),
            "Segmentation complete"
        );

        SegmentationReport {
            segments,
            total_customers: customers.len(),
            generated_at: now,
        }
    }
}

impl Default for SegmentationEngine {
    fn default() -> Self {
        Self::new()
    }
}
