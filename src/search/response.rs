//! Search response model
//!
//! Wire-facing envelope plus the flattened result types handed to callers.

use serde::Deserialize;
use serde_json::Value;

use crate::paginator::{Cursor, SortKey};

/// Backend search response envelope, as decoded off the wire
#[derive(Debug, Clone, Deserialize)]
pub struct RawSearchResponse {
    /// Backend-reported elapsed time, in milliseconds
    #[serde(default)]
    pub took: i64,

    /// Hit envelope
    #[serde(default)]
    pub hits: HitsEnvelope,

    /// Raw aggregation payload, passed through undecoded
    #[serde(default)]
    pub aggregations: Option<Value>,
}

/// Hits section of the response envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitsEnvelope {
    /// Total match count
    #[serde(default)]
    pub total: TotalHits,

    /// Hits on this page, in rank order
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// Total match count wrapper
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TotalHits {
    /// Match count value
    #[serde(default)]
    pub value: i64,
}

/// One search hit
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    /// Source document payload
    #[serde(rename = "_source", default)]
    pub source: Value,

    /// Relevance score; absent when the backend sorts without scoring
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,

    /// Origin index name
    #[serde(rename = "_index", default)]
    pub index: String,

    /// Document type tag
    #[serde(rename = "_type", default)]
    pub doc_type: String,

    /// Document version
    #[serde(rename = "_version", default)]
    pub version: i64,

    /// Tie-break key for this hit; basis for cursor derivation
    #[serde(default)]
    pub sort: SortKey,
}

/// Decoded result of one executed search
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Backend-reported elapsed time, in milliseconds
    pub took_ms: i64,

    /// Total match count across all pages
    pub total: i64,

    /// Hits on this page, in rank order
    pub hits: Vec<SearchHit>,

    /// Raw aggregation payload, if the query asked for one
    pub aggregations: Option<Value>,
}

impl From<RawSearchResponse> for SearchResult {
    fn from(raw: RawSearchResponse) -> Self {
        Self {
            took_ms: raw.took,
            total: raw.hits.total.value,
            hits: raw.hits.hits,
            aggregations: raw.aggregations,
        }
    }
}

/// One page of results plus the cursor for the next page
#[derive(Debug, Clone)]
pub struct Page {
    /// The page's results
    pub result: SearchResult,

    /// Cursor resuming after this page; empty when there are no more pages
    pub next: Cursor,
}

impl Page {
    /// Returns true if another page may follow
    pub fn has_more(&self) -> bool {
        !self.next.is_empty()
    }
}
