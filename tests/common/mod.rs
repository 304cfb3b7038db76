//! Shared test doubles
//!
//! A scripted backend client: tests queue responses up front and inspect the
//! recorded calls afterward.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::{json, Value};

use aerosearch::client::{
    ClientFuture, ClientResponse, ConflictPolicy, IndexClient, TransportError,
};
use aerosearch::context::RequestContext;

/// One recorded backend call
#[derive(Debug, Clone)]
pub enum RecordedCall {
    Search {
        indices: Vec<String>,
        body: Value,
    },
    Get {
        index: String,
        id: String,
    },
    UpdateById {
        index: String,
        id: String,
        body: Value,
    },
    UpdateByQuery {
        index: String,
        body: Value,
        conflicts: ConflictPolicy,
    },
    IndexDocument {
        index: String,
        id: Option<String>,
        body: Value,
    },
}

/// Scripted mock backend
#[derive(Default)]
pub struct MockClient {
    responses: Mutex<VecDeque<Result<ClientResponse, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn push_response(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ClientResponse::new(status, body)));
    }

    /// Queue a transport failure
    pub fn push_transport_error(&self, reason: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError::new(reason)));
    }

    /// Recorded calls in arrival order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, call: RecordedCall) -> Result<ClientResponse, TransportError> {
        self.calls.lock().unwrap().push(call);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ClientResponse::new(200, json!({}))))
    }
}

impl IndexClient for MockClient {
    fn search<'a>(
        &'a self,
        indices: &'a [String],
        body: Value,
        _ctx: &'a RequestContext,
    ) -> ClientFuture<'a> {
        let result = self.respond(RecordedCall::Search {
            indices: indices.to_vec(),
            body,
        });
        Box::pin(async move { result })
    }

    fn get_by_id<'a>(
        &'a self,
        index: &'a str,
        id: &'a str,
        _ctx: &'a RequestContext,
    ) -> ClientFuture<'a> {
        let result = self.respond(RecordedCall::Get {
            index: index.to_string(),
            id: id.to_string(),
        });
        Box::pin(async move { result })
    }

    fn update_by_id<'a>(
        &'a self,
        index: &'a str,
        id: &'a str,
        body: Value,
        _ctx: &'a RequestContext,
    ) -> ClientFuture<'a> {
        let result = self.respond(RecordedCall::UpdateById {
            index: index.to_string(),
            id: id.to_string(),
            body,
        });
        Box::pin(async move { result })
    }

    fn update_by_query<'a>(
        &'a self,
        index: &'a str,
        body: Value,
        conflicts: ConflictPolicy,
        _ctx: &'a RequestContext,
    ) -> ClientFuture<'a> {
        let result = self.respond(RecordedCall::UpdateByQuery {
            index: index.to_string(),
            body,
            conflicts,
        });
        Box::pin(async move { result })
    }

    fn index_document<'a>(
        &'a self,
        index: &'a str,
        id: Option<&'a str>,
        body: Value,
        _ctx: &'a RequestContext,
    ) -> ClientFuture<'a> {
        let result = self.respond(RecordedCall::IndexDocument {
            index: index.to_string(),
            id: id.map(str::to_string),
            body,
        });
        Box::pin(async move { result })
    }
}

/// Client whose calls never complete, for deadline tests
pub struct HangingClient;

impl IndexClient for HangingClient {
    fn search<'a>(
        &'a self,
        _indices: &'a [String],
        _body: Value,
        _ctx: &'a RequestContext,
    ) -> ClientFuture<'a> {
        Box::pin(std::future::pending())
    }

    fn get_by_id<'a>(
        &'a self,
        _index: &'a str,
        _id: &'a str,
        _ctx: &'a RequestContext,
    ) -> ClientFuture<'a> {
        Box::pin(std::future::pending())
    }

    fn update_by_id<'a>(
        &'a self,
        _index: &'a str,
        _id: &'a str,
        _body: Value,
        _ctx: &'a RequestContext,
    ) -> ClientFuture<'a> {
        Box::pin(std::future::pending())
    }

    fn update_by_query<'a>(
        &'a self,
        _index: &'a str,
        _body: Value,
        _conflicts: ConflictPolicy,
        _ctx: &'a RequestContext,
    ) -> ClientFuture<'a> {
        Box::pin(std::future::pending())
    }

    fn index_document<'a>(
        &'a self,
        _index: &'a str,
        _id: Option<&'a str>,
        _body: Value,
        _ctx: &'a RequestContext,
    ) -> ClientFuture<'a> {
        Box::pin(std::future::pending())
    }
}
