//! # Search Errors
//!
//! Error taxonomy for query rendering and execution. Nothing is swallowed or
//! retried internally; every failure carries enough structure for the caller
//! to tell "my query was wrong" from "the service is down" from "nothing
//! matched".

use thiserror::Error;

use crate::client::TransportError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, SearchError>;

/// Errors surfaced by query rendering and execution
#[derive(Debug, Error)]
pub enum SearchError {
    // ==================
    // Caller Errors
    // ==================
    /// The assembled query failed to serialize (programmer/data error)
    #[error("failed to render query: {0}")]
    Render(#[source] serde_json::Error),

    /// Point lookup miss (expected, non-exceptional path)
    #[error("document not found")]
    NotFound,

    // ==================
    // Backend Errors
    // ==================
    /// Network or connection failure; retry policy is the caller's
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The index rejected or errored on a well-formed request
    #[error("[{status}] {kind}: {reason}")]
    Backend {
        /// HTTP-like status indicator from the backend
        status: u16,
        /// Backend error type tag
        kind: String,
        /// Backend error reason
        reason: String,
    },

    /// The response body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl SearchError {
    /// Returns true if the failure is a point-lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, SearchError::NotFound)
    }
}
