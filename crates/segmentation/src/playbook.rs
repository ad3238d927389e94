//! Static segment playbook: descriptive traits and the marketing strategy
//! attached to every segment.

use bistro_core::SegmentName;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Low,
    Medium,
    High,
    Premium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SegmentStrategy {
    pub approach: String,
    pub tactics: Vec<String>,
    pub budget: BudgetTier,
    /// Expected return multiplier on marketing spend.
    #[serde(rename = "expectedROI")]
    pub expected_roi: f64,
}

struct StrategyEntry {
    approach: &'static str,
    tactics: &'static [&'static str],
    budget: BudgetTier,
    expected_roi: f64,
}

const VIP_TRAITS: &[&str] = &[
    "Visit at least weekly",
    "Highest average spend per visit",
    "Most responsive to exclusive experiences",
];
const LOYAL_TRAITS: &[&str] = &[
    "Regular visits every one to two weeks",
    "Above-average spend",
    "Engaged with loyalty programs",
];
const AT_RISK_TRAITS: &[&str] = &[
    "No visit in over a month",
    "Low visit frequency",
    "Declining engagement",
];
const NEW_TRAITS: &[&str] = &[
    "Recent first visits",
    "Low frequency so far",
    "Still forming dining habits",
];
const REGULAR_TRAITS: &[&str] = &[
    "Moderate visit frequency",
    "Average spend",
    "Stable engagement",
];

const VIP_STRATEGY: StrategyEntry = StrategyEntry {
    approach: "Exclusive experiences and recognition",
    tactics: &[
        "Chef's table invitations",
        "Early access to seasonal menus",
        "Personal host follow-up after each visit",
        "Complimentary tasting courses",
    ],
    budget: BudgetTier::Premium,
    expected_roi: 4.5,
};
const LOYAL_STRATEGY: StrategyEntry = StrategyEntry {
    approach: "Reward consistency and deepen the relationship",
    tactics: &[
        "Tiered loyalty points",
        "Birthday and anniversary offers",
        "Member-only events",
    ],
    budget: BudgetTier::High,
    expected_roi: 3.2,
};
const AT_RISK_STRATEGY: StrategyEntry = StrategyEntry {
    approach: "Win-back campaign",
    tactics: &[
        "Personalized we-miss-you offer",
        "Limited-time discount on favorite dishes",
        "Feedback survey with incentive",
    ],
    budget: BudgetTier::Medium,
    expected_roi: 2.1,
};
const NEW_STRATEGY: StrategyEntry = StrategyEntry {
    approach: "Onboarding and second-visit conversion",
    tactics: &[
        "Welcome series emails",
        "Second-visit incentive",
        "Menu highlights based on first order",
    ],
    budget: BudgetTier::Medium,
    expected_roi: 2.8,
};
const REGULAR_STRATEGY: StrategyEntry = StrategyEntry {
    approach: "Increase visit frequency and basket size",
    tactics: &[
        "Weekday specials",
        "Bundle and upsell offers",
        "Social media engagement",
    ],
    budget: BudgetTier::Low,
    expected_roi: 1.8,
};

/// Descriptive traits shown alongside a segment.
pub fn characteristics(name: SegmentName) -> Vec<String> {
    let traits = match name {
        SegmentName::VipChampions => VIP_TRAITS,
        SegmentName::LoyalCustomers => LOYAL_TRAITS,
        SegmentName::AtRisk => AT_RISK_TRAITS,
        SegmentName::NewCustomers => NEW_TRAITS,
        SegmentName::Regular => REGULAR_TRAITS,
    };
    traits.iter().map(|t| t.to_string()).collect()
}

/// Marketing strategy for a segment.
pub fn strategy(name: SegmentName) -> SegmentStrategy {
    let entry = match name {
        SegmentName::VipChampions => &VIP_STRATEGY,
        SegmentName::LoyalCustomers => &LOYAL_STRATEGY,
        SegmentName::AtRisk => &AT_RISK_STRATEGY,
        SegmentName::NewCustomers => &NEW_STRATEGY,
        SegmentName::Regular => &REGULAR_STRATEGY,
    };
    SegmentStrategy {
        approach: entry.approach.to_string(),
        tactics: entry.tactics.iter().map(|t| t.to_string()).collect(),
        budget: entry.budget,
        expected_roi: entry.expected_roi,
    }
}
