//! Service configuration
//!
//! Configuration for the search service, loadable from any serde source.

use serde::{Deserialize, Serialize};

/// Search service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Page size used when a query does not set one (default: 15)
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
}

fn default_page_size() -> u64 {
    15
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}
