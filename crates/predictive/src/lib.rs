//! Predictive customer scoring — churn risk and lifetime-value projection.

pub mod churn;
pub mod ltv;

pub use churn::{churn_score, ChurnPrediction, ChurnPredictor, ChurnReport, ChurnRisk};
pub use ltv::{GrowthTier, LtvPrediction, LtvPredictor, LtvReport};
