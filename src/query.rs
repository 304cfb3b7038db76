//! Boolean query fragments
//!
//! `BoolQuery` is the clause container behind every search: four independent
//! append-only sequences of opaque clause documents. Clause payload shapes
//! are backend-specific and not modeled here.

use serde::Serialize;
use serde_json::Value;

/// Boolean clause container
///
/// Insertion order is preserved per sequence; empty sequences are omitted
/// from the serialized form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BoolQuery {
    /// Clauses a hit must match (scored)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Value>,

    /// Clauses a hit should match (scored, optional)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Value>,

    /// Clauses a hit must not match
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<Value>,

    /// Clauses a hit must match (unscored)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<Value>,
}

impl BoolQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a must clause
    pub fn with_must(mut self, clause: Value) -> Self {
        self.must.push(clause);
        self
    }

    /// Append a should clause
    pub fn with_should(mut self, clause: Value) -> Self {
        self.should.push(clause);
        self
    }

    /// Append a must-not clause
    pub fn with_must_not(mut self, clause: Value) -> Self {
        self.must_not.push(clause);
        self
    }

    /// Append a filter clause
    pub fn with_filter(mut self, clause: Value) -> Self {
        self.filter.push(clause);
        self
    }

    /// Returns true if no clause has been added to any sequence
    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
            && self.should.is_empty()
            && self.must_not.is_empty()
            && self.filter.is_empty()
    }
}
