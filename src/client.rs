//! Index Service Client
//!
//! The narrow seam between the query layer and the search backend. The core
//! depends only on the call shapes below and on the response exposing an
//! error flag, a status indicator, and a decodable body. Connection
//! management and authentication live behind implementations of this trait.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use thiserror::Error;

use crate::context::RequestContext;

/// Network or connection failure reaching the backend
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    /// Create a transport error with the given reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Conflict handling for update-by-query calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Abort on the first version conflict
    #[default]
    Abort,
    /// Count conflicts and proceed
    Proceed,
}

impl ConflictPolicy {
    /// Wire rendering of the policy
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictPolicy::Abort => "abort",
            ConflictPolicy::Proceed => "proceed",
        }
    }
}

/// Raw backend response: status indicator plus decodable body
#[derive(Debug, Clone)]
pub struct ClientResponse {
    /// Status indicator (HTTP-like)
    pub status: u16,
    /// Decoded body
    pub body: Value,
}

impl ClientResponse {
    /// Create a response
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Returns true if the backend flagged the response as an error
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Future returned by client calls
pub type ClientFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ClientResponse, TransportError>> + Send + 'a>>;

/// Backend client seam
///
/// Implementations own connections, authentication, and the exact wire
/// format. All calls take the ambient [`RequestContext`] so implementations
/// can propagate correlation IDs; cancellation is dropping the future.
pub trait IndexClient: Send + Sync {
    /// Execute a search request against one or more indexes
    fn search<'a>(
        &'a self,
        indices: &'a [String],
        body: Value,
        ctx: &'a RequestContext,
    ) -> ClientFuture<'a>;

    /// Fetch a single document by ID
    fn get_by_id<'a>(
        &'a self,
        index: &'a str,
        id: &'a str,
        ctx: &'a RequestContext,
    ) -> ClientFuture<'a>;

    /// Apply an update payload to one document
    fn update_by_id<'a>(
        &'a self,
        index: &'a str,
        id: &'a str,
        body: Value,
        ctx: &'a RequestContext,
    ) -> ClientFuture<'a>;

    /// Apply an update payload to every document matching its query
    fn update_by_query<'a>(
        &'a self,
        index: &'a str,
        body: Value,
        conflicts: ConflictPolicy,
        ctx: &'a RequestContext,
    ) -> ClientFuture<'a>;

    /// Index a document, optionally under an explicit ID
    fn index_document<'a>(
        &'a self,
        index: &'a str,
        id: Option<&'a str>,
        body: Value,
        ctx: &'a RequestContext,
    ) -> ClientFuture<'a>;
}

/// Await a client call under the context's time budget, if one is set
///
/// A blown budget surfaces as a transport failure; the caller decides retry
/// policy. Dropping the returned future cancels the in-flight call.
pub(crate) async fn call_bounded(
    ctx: &RequestContext,
    call: ClientFuture<'_>,
) -> Result<ClientResponse, TransportError> {
    match ctx.timeout {
        Some(budget) => tokio::time::timeout(budget, call)
            .await
            .map_err(|_| TransportError::new("request timed out"))?,
        None => call.await,
    }
}
