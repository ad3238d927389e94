//! Customer feedback aggregation — per-item urgency escalation and batch
//! sentiment insights over an external text classifier.

pub mod analyzer;
pub mod classifier;
pub mod models;

pub use analyzer::{summarize, urgency_for, FeedbackAnalyzer};
pub use classifier::{FeedbackClassifier, HttpFeedbackClassifier};
pub use models::*;
