//! Observability
//!
//! Structured JSON logging for query execution.

pub mod logger;

pub use logger::{Logger, Severity};
