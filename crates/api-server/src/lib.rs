#![warn(clippy::unwrap_used)]

pub mod feedback_rest;
pub mod insights_rest;
pub mod recommend_rest;
pub mod rest;
pub mod server;
pub mod state;
pub mod swagger;

pub use server::{router, ApiServer};
pub use state::AppState;
pub use swagger::ApiDoc;
