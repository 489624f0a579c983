//! Planner API error types

use thiserror::Error;

/// Errors that can occur while talking to the planning service
///
/// Every variant is a transport-level failure from the caller's point of view:
/// the service either could not be reached or did not answer in a shape the
/// client understands. Business failures are not errors; they arrive as
/// `TripResult::Failure`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Check if this error came from a timed-out request
    pub fn is_timeout(&self) -> bool {
        match self {
            ApiError::Network(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
