//! Shared records, configuration, and error taxonomy for the customer
//! insights engine.

pub mod collaborator;
pub mod config;
pub mod error;
pub mod numeric;
pub mod types;

pub use collaborator::{CollaboratorClient, CollaboratorError};
pub use config::AppConfig;
pub use error::{InsightsError, InsightsResult};
pub use types::{
    BehaviorSnapshot, CustomerRecord, MenuItemEmbeddingRecord, PurchaseSnapshot, RejectedRecord,
    SegmentName,
};
