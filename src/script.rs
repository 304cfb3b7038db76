//! Scripted updates
//!
//! Builder for script-driven document updates: with a document ID it targets
//! the single-document update call, without one it becomes an update-by-query
//! governed by a conflict policy.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::{call_bounded, ConflictPolicy, IndexClient};
use crate::context::RequestContext;
use crate::errors::{SearchError, ServiceResult};
use crate::search::backend_error;

const DEFAULT_LANG: &str = "painless";

/// Script document sent to the backend
#[derive(Debug, Clone, Serialize)]
struct ScriptSpec {
    source: String,
    lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

/// Builder for a scripted update
pub struct ScriptedUpdate {
    client: Arc<dyn IndexClient>,
    index: String,
    script: ScriptSpec,
    query: Option<Value>,
    id: Option<String>,
    conflicts: ConflictPolicy,
}

impl ScriptedUpdate {
    /// Create an update bound to a client and index
    pub fn new(client: Arc<dyn IndexClient>, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
            script: ScriptSpec {
                source: String::new(),
                lang: DEFAULT_LANG.to_string(),
                params: None,
            },
            query: None,
            id: None,
            conflicts: ConflictPolicy::Abort,
        }
    }

    /// Set the script source
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.script.source = source.into();
        self
    }

    /// Override the script language
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.script.lang = lang.into();
        self
    }

    /// Set the script parameters
    pub fn params(mut self, params: Value) -> Self {
        self.script.params = Some(params);
        self
    }

    /// Restrict an update-by-query to documents matching this query
    pub fn query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    /// Target a single document instead of a query
    pub fn document_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Proceed past version conflicts instead of aborting (by-query only)
    pub fn on_conflict(mut self, policy: ConflictPolicy) -> Self {
        self.conflicts = policy;
        self
    }

    /// Render the update payload
    pub fn render(&self) -> ServiceResult<Value> {
        let mut payload = Map::new();
        if let Some(query) = &self.query {
            payload.insert("query".to_string(), query.clone());
        }
        payload.insert(
            "script".to_string(),
            serde_json::to_value(&self.script).map_err(SearchError::Render)?,
        );
        Ok(Value::Object(payload))
    }

    /// Issue the update call
    pub async fn execute(self, ctx: &RequestContext) -> ServiceResult<()> {
        let body = self.render()?;
        let call = match &self.id {
            Some(id) => self.client.update_by_id(&self.index, id, body, ctx),
            None => self
                .client
                .update_by_query(&self.index, body, self.conflicts, ctx),
        };
        let response = call_bounded(ctx, call).await?;

        if response.is_error() {
            return Err(backend_error(&response));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::tests_support::NullClient;
    use serde_json::json;

    fn update() -> ScriptedUpdate {
        ScriptedUpdate::new(Arc::new(NullClient), "articles")
    }

    #[test]
    fn test_render_script_envelope() {
        let payload = update()
            .source("ctx._source.views += params.n")
            .params(json!({"n": 1}))
            .render()
            .unwrap();

        assert_eq!(
            payload,
            json!({
                "script": {
                    "source": "ctx._source.views += params.n",
                    "lang": "painless",
                    "params": {"n": 1},
                }
            })
        );
    }

    #[test]
    fn test_render_with_query() {
        let payload = update()
            .source("ctx._source.archived = true")
            .query(json!({"term": {"status": "stale"}}))
            .render()
            .unwrap();

        assert_eq!(payload["query"], json!({"term": {"status": "stale"}}));
        assert!(payload["script"].get("params").is_none());
    }

    #[test]
    fn test_lang_override() {
        let payload = update().source("1 + 1").lang("expression").render().unwrap();
        assert_eq!(payload["script"]["lang"], json!("expression"));
    }
}
