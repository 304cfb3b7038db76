//! Document writes
//!
//! Thin builder over the backend's index-document call. Indexing semantics
//! (mappings, refresh behavior) belong to the backend; this only shapes and
//! issues the request.

use std::sync::Arc;

use serde_json::Value;

use crate::client::{call_bounded, IndexClient};
use crate::context::RequestContext;
use crate::errors::ServiceResult;
use crate::search::backend_error;

/// Builder for indexing one document
pub struct DocumentWrite {
    client: Arc<dyn IndexClient>,
    index: String,
    id: Option<String>,
    source: Value,
}

impl DocumentWrite {
    /// Create a write bound to a client and index
    pub fn new(client: Arc<dyn IndexClient>, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
            id: None,
            source: Value::Null,
        }
    }

    /// Index under an explicit document ID instead of a generated one
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the document payload
    pub fn source(mut self, source: Value) -> Self {
        self.source = source;
        self
    }

    /// Issue the index-document call
    pub async fn execute(self, ctx: &RequestContext) -> ServiceResult<()> {
        let call = self
            .client
            .index_document(&self.index, self.id.as_deref(), self.source, ctx);
        let response = call_bounded(ctx, call).await?;

        if response.is_error() {
            return Err(backend_error(&response));
        }
        Ok(())
    }
}
