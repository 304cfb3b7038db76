//! aerosearch - query construction and cursor pagination for search indexes
//!
//! Callers assemble boolean queries through an immutable builder, execute
//! them against a backend behind the [`client::IndexClient`] seam, and walk
//! result sets with opaque cursors derived from each page's last sort key.

pub mod client;
pub mod config;
pub mod context;
pub mod document;
pub mod errors;
pub mod observability;
pub mod paginator;
pub mod query;
pub mod script;
pub mod search;
pub mod service;
