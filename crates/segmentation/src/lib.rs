//! RFM segmentation engine — rule-based customer grouping with static
//! per-segment characteristics and marketing strategies.

pub mod engine;
pub mod playbook;

pub use engine::{classify_rfm, RfmScores, Segment, SegmentationEngine, SegmentationReport};
pub use playbook::{BudgetTier, SegmentStrategy};
