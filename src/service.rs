//! Index Service facade
//!
//! Groups the per-index capabilities behind one handle: search builders,
//! document writes, scripted updates, and point lookups all bound to the
//! same client and index name. Handles are cheap to clone and several may
//! share one client.

use std::sync::Arc;

use crate::client::{call_bounded, IndexClient};
use crate::config::SearchConfig;
use crate::context::RequestContext;
use crate::document::DocumentWrite;
use crate::errors::{SearchError, ServiceResult};
use crate::script::ScriptedUpdate;
use crate::search::response::SearchHit;
use crate::search::SearchBuilder;

/// Handle to one index on one backend
#[derive(Clone)]
pub struct IndexService {
    client: Arc<dyn IndexClient>,
    config: SearchConfig,
    index: String,
}

impl IndexService {
    /// Create a handle with the default configuration
    pub fn new(client: Arc<dyn IndexClient>, index: impl Into<String>) -> Self {
        Self {
            client,
            config: SearchConfig::default(),
            index: index.into(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// The index this handle targets
    pub fn index_name(&self) -> &str {
        &self.index
    }

    /// Fresh search builder bound to this index
    pub fn search(&self) -> SearchBuilder {
        SearchBuilder::new(Arc::clone(&self.client), vec![self.index.clone()])
            .with_default_page_size(self.config.default_page_size)
    }

    /// Fresh search builder spanning this index plus the given ones
    pub fn search_across(&self, indices: impl IntoIterator<Item = String>) -> SearchBuilder {
        let mut all = vec![self.index.clone()];
        all.extend(indices);
        SearchBuilder::new(Arc::clone(&self.client), all)
            .with_default_page_size(self.config.default_page_size)
    }

    /// Fresh document write bound to this index
    pub fn document(&self) -> DocumentWrite {
        DocumentWrite::new(Arc::clone(&self.client), self.index.clone())
    }

    /// Fresh scripted update bound to this index
    pub fn script(&self) -> ScriptedUpdate {
        ScriptedUpdate::new(Arc::clone(&self.client), self.index.clone())
    }

    /// Point lookup by document ID
    ///
    /// A miss is the expected branch and surfaces as [`SearchError::NotFound`]
    /// rather than a generic backend error.
    pub async fn get(&self, id: &str, ctx: &RequestContext) -> ServiceResult<SearchHit> {
        let call = self.client.get_by_id(&self.index, id, ctx);
        let response = call_bounded(ctx, call).await?;

        if response.is_error() {
            return Err(SearchError::NotFound);
        }
        serde_json::from_value(response.body).map_err(SearchError::Decode)
    }
}
