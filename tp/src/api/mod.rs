//! Planning service client module
//!
//! Provides the PlannerClient seam plus its HTTP implementation.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod http;
pub mod wire;

pub use client::PlannerClient;
pub use error::ApiError;
pub use http::HttpPlannerClient;

use crate::config::ServiceConfig;

/// Create the planner client described by the service configuration
pub fn create_client(config: &ServiceConfig) -> Result<Arc<dyn PlannerClient>, ApiError> {
    debug!(base_url = %config.base_url, "create_client: called");
    Ok(Arc::new(HttpPlannerClient::from_config(config)?))
}
