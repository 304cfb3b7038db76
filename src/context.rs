//! Request Context
//!
//! Context carried into every backend round trip: a request ID for log
//! correlation, an optional time budget, and free-form observability
//! metadata. The core never retries; the timeout here is the only deadline
//! it enforces, and dropping an in-flight future cancels it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;
use uuid::Uuid;

/// Context carried through a single backend round trip
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID for log correlation
    pub request_id: Uuid,

    /// Optional time budget for the round trip
    pub timeout: Option<Duration>,

    /// Metadata for observability
    pub metadata: HashMap<String, Value>,

    /// Start time for duration tracking
    started_at: Instant,
}

impl RequestContext {
    /// Create a new request context with no deadline
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            timeout: None,
            metadata: HashMap::new(),
            started_at: Instant::now(),
        }
    }

    /// Set the time budget for the round trip
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add metadata for observability
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_defaults() {
        let ctx = RequestContext::new();
        assert!(ctx.timeout.is_none());
        assert!(ctx.metadata.is_empty());
    }

    #[test]
    fn test_context_builder() {
        let ctx = RequestContext::new()
            .with_timeout(Duration::from_secs(5))
            .with_metadata("caller", json!("feed-service"));

        assert_eq!(ctx.timeout, Some(Duration::from_secs(5)));
        assert_eq!(ctx.metadata["caller"], json!("feed-service"));
    }

    #[test]
    fn test_request_ids_unique() {
        assert_ne!(RequestContext::new().request_id, RequestContext::new().request_id);
    }
}
