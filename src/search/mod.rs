//! Search builder and execution
//!
//! `SearchBuilder` is an immutable value: every configuring call takes
//! `&self`, clones the state, and returns the modified clone. A builder held
//! as a shared template is therefore safe to branch from concurrently: no
//! call ever mutates a state another reference observes. A builder is
//! consumed exactly once by `execute`; `render` stays borrowing so payloads
//! can be inspected without spending the builder.

pub mod response;

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::client::{call_bounded, ClientResponse, IndexClient};
use crate::context::RequestContext;
use crate::errors::{SearchError, ServiceResult};
use crate::observability::Logger;
use crate::paginator::Cursor;
use crate::query::BoolQuery;
use crate::search::response::{Page, RawSearchResponse, SearchResult};

/// Page size used when neither the builder nor the service config sets one
pub const DEFAULT_PAGE_SIZE: u64 = 15;

/// Page size policy for one query
///
/// The legacy integer encoding (0 = unset, negative = explicitly zero) maps
/// onto this tri-state via [`PageSize::from_legacy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// Resolve to the configured default at render time
    #[default]
    Default,
    /// Explicitly request zero hits (aggregation-only queries)
    Zero,
    /// Request exactly this many hits
    Hits(u64),
}

impl PageSize {
    /// Map the legacy sign-encoded size: 0 is unset, negative is explicit zero
    pub fn from_legacy(size: i64) -> Self {
        match size {
            0 => PageSize::Default,
            n if n < 0 => PageSize::Zero,
            n => PageSize::Hits(n as u64),
        }
    }

    /// Resolve to the concrete hit count
    pub fn resolve(&self, default_size: u64) -> u64 {
        match self {
            PageSize::Default => default_size,
            PageSize::Zero => 0,
            PageSize::Hits(n) => *n,
        }
    }
}

/// Top-level query shape
///
/// The shapes are mutually exclusive by construction: setting a function
/// score or adding a union clause moves the builder into that shape, and the
/// last shape-setting call wins.
#[derive(Debug, Clone, Default)]
enum QueryShape {
    /// The accumulated boolean query is the top-level query
    #[default]
    Plain,
    /// A function-score document replaces the boolean query entirely
    FunctionScored(Value),
    /// Base query as a filter, each union clause as a should alternative
    Union(Vec<BoolQuery>),
}

/// Immutable search query builder
///
/// Bound to a backend client and one or more index names at construction.
/// Configuring calls are pure; `execute` consumes the builder.
#[derive(Clone)]
pub struct SearchBuilder {
    client: Arc<dyn IndexClient>,
    indices: Vec<String>,
    base: BoolQuery,
    shape: QueryShape,
    sort: Vec<Value>,
    size: PageSize,
    aggregations: Option<Value>,
    cursor: Option<Cursor>,
    default_page_size: u64,
}

impl fmt::Debug for SearchBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchBuilder")
            .field("indices", &self.indices)
            .field("base", &self.base)
            .field("shape", &self.shape)
            .field("sort", &self.sort)
            .field("size", &self.size)
            .field("aggregations", &self.aggregations)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl SearchBuilder {
    /// Create a builder bound to a client and index names
    pub fn new(client: Arc<dyn IndexClient>, indices: Vec<String>) -> Self {
        Self {
            client,
            indices,
            base: BoolQuery::new(),
            shape: QueryShape::Plain,
            sort: Vec::new(),
            size: PageSize::Default,
            aggregations: None,
            cursor: None,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the page size used when the builder leaves it unset
    pub fn with_default_page_size(&self, size: u64) -> Self {
        let mut next = self.clone();
        next.default_page_size = size;
        next
    }

    /// Append a sort spec, passed through verbatim
    pub fn with_sort(&self, spec: Value) -> Self {
        let mut next = self.clone();
        next.sort.push(spec);
        next
    }

    /// Append a must clause to the base query
    pub fn add_must(&self, clause: Value) -> Self {
        let mut next = self.clone();
        next.base.must.push(clause);
        next
    }

    /// Append a should clause to the base query
    pub fn add_should(&self, clause: Value) -> Self {
        let mut next = self.clone();
        next.base.should.push(clause);
        next
    }

    /// Append a must-not clause to the base query
    pub fn add_must_not(&self, clause: Value) -> Self {
        let mut next = self.clone();
        next.base.must_not.push(clause);
        next
    }

    /// Append a filter clause to the base query
    pub fn add_filter(&self, clause: Value) -> Self {
        let mut next = self.clone();
        next.base.filter.push(clause);
        next
    }

    /// Set the page size with the legacy sign encoding
    ///
    /// `0` means unset (resolves to the default at render time), a negative
    /// value explicitly requests zero hits, a positive value is used as-is.
    pub fn set_size(&self, size: i64) -> Self {
        self.page_size(PageSize::from_legacy(size))
    }

    /// Set the page size explicitly
    pub fn page_size(&self, size: PageSize) -> Self {
        let mut next = self.clone();
        next.size = size;
        next
    }

    /// Set the aggregation spec; a later call replaces an earlier one
    pub fn set_aggregation(&self, spec: Value) -> Self {
        let mut next = self.clone();
        next.aggregations = Some(spec);
        next
    }

    /// Replace the top-level query with a function-score document
    ///
    /// A later shape-setting call (this or `add_union_clause`) wins.
    pub fn set_function_score(&self, spec: Value) -> Self {
        let mut next = self.clone();
        next.shape = QueryShape::FunctionScored(spec);
        next
    }

    /// Add one alternative clause, switching the builder into union mode
    ///
    /// In union mode the rendered top-level query matches the base query as a
    /// filter AND any of the union clauses: "match base filters AND (any of
    /// these alternative shapes)".
    pub fn add_union_clause(&self, clause: BoolQuery) -> Self {
        let mut next = self.clone();
        match &mut next.shape {
            QueryShape::Union(clauses) => clauses.push(clause),
            _ => next.shape = QueryShape::Union(vec![clause]),
        }
        next
    }

    /// Resume after a previously returned cursor
    pub fn set_cursor(&self, cursor: Cursor) -> Self {
        let mut next = self.clone();
        next.cursor = Some(cursor);
        next
    }

    /// The page size this builder will request
    pub fn resolved_size(&self) -> u64 {
        self.size.resolve(self.default_page_size)
    }

    /// Render the request payload
    ///
    /// Deterministic pure function of the builder state. A set cursor that is
    /// empty or malformed contributes no resume directive; token validation
    /// is the caller's concern via [`Cursor::sort_key`].
    pub fn render(&self) -> ServiceResult<Value> {
        let mut payload = Map::new();

        let query = match &self.shape {
            QueryShape::Plain => json!({ "bool": self.render_bool(&self.base)? }),
            QueryShape::FunctionScored(spec) => json!({ "function_score": spec }),
            QueryShape::Union(clauses) => {
                let alternatives = clauses
                    .iter()
                    .map(|clause| Ok(json!({ "bool": self.render_bool(clause)? })))
                    .collect::<ServiceResult<Vec<Value>>>()?;
                json!({
                    "bool": {
                        "filter": { "bool": self.render_bool(&self.base)? },
                        "should": alternatives,
                    }
                })
            }
        };
        payload.insert("query".to_string(), query);

        if let Some(cursor) = &self.cursor {
            if let Ok(key) = cursor.sort_key() {
                if !key.is_empty() {
                    let values =
                        serde_json::to_value(key.values()).map_err(SearchError::Render)?;
                    payload.insert("search_after".to_string(), values);
                }
            }
        }

        if !self.sort.is_empty() {
            payload.insert("sort".to_string(), Value::Array(self.sort.clone()));
        }

        // Zero is a meaningful "no hits" request, so the resolved size is
        // always attached.
        payload.insert("size".to_string(), json!(self.resolved_size()));

        if let Some(aggs) = &self.aggregations {
            payload.insert("aggs".to_string(), aggs.clone());
        }

        Ok(Value::Object(payload))
    }

    fn render_bool(&self, query: &BoolQuery) -> ServiceResult<Value> {
        serde_json::to_value(query).map_err(SearchError::Render)
    }

    /// Render, issue the request, and decode the response into a page
    ///
    /// The next cursor is derived from the last hit's sort key when the page
    /// came back exactly full; a short page is the end-of-results signal.
    pub async fn execute(self, ctx: &RequestContext) -> ServiceResult<Page> {
        let size = self.resolved_size();
        let body = self.render()?;

        let call = self.client.search(&self.indices, body, ctx);
        let response = call_bounded(ctx, call).await?;

        if response.is_error() {
            let err = backend_error(&response);
            Logger::warn(
                "search.backend_error",
                &[
                    ("error", &err.to_string()),
                    ("index", &self.indices.join(",")),
                    ("request_id", &ctx.request_id.to_string()),
                ],
            );
            return Err(err);
        }

        let raw: RawSearchResponse =
            serde_json::from_value(response.body).map_err(SearchError::Decode)?;
        let result = SearchResult::from(raw);

        let next = match result.hits.last() {
            Some(last) if result.hits.len() as u64 == size => Cursor::from_sort_key(&last.sort),
            _ => Cursor::empty(),
        };

        Logger::trace(
            "search.execute",
            &[
                ("hits", &result.hits.len().to_string()),
                ("index", &self.indices.join(",")),
                ("request_id", &ctx.request_id.to_string()),
                ("took_ms", &result.took_ms.to_string()),
            ],
        );

        Ok(Page { result, next })
    }
}

/// Decode an error-flagged response into a structured backend error
pub(crate) fn backend_error(response: &ClientResponse) -> SearchError {
    let error = response.body.get("error");
    let kind = error
        .and_then(|e| e.get("type"))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let reason = error
        .and_then(|e| e.get("reason"))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    SearchError::Backend {
        status: response.status,
        kind,
        reason,
    }
}
