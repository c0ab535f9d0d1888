//! Web search handler.

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::WebSearcher;
use crate::registry::{HandlerFailure, Invocation, ToolHandler};

use super::{optional_i64, require_str};

pub struct WebSearchHandler {
    web: Arc<dyn WebSearcher>,
    default_results: usize,
}

impl WebSearchHandler {
    pub fn new(web: Arc<dyn WebSearcher>, default_results: usize) -> Self {
        Self {
            web,
            default_results,
        }
    }
}

#[async_trait]
impl ToolHandler for WebSearchHandler {
    async fn execute(&self, invocation: Invocation<'_>) -> Result<String, HandlerFailure> {
        let tool_name = invocation.tool.name();
        let query = require_str(invocation.args, "query", &tool_name)?;
        let max_results = optional_i64(invocation.args, "max_results")
            .map(|n| n.max(1) as usize)
            .unwrap_or(self.default_results);

        let hits = self
            .web
            .search(query, max_results)
            .await
            .map_err(|error| error.classify(&tool_name))?;

        if hits.is_empty() {
            return Ok("No results.".to_string());
        }
        Ok(hits
            .iter()
            .enumerate()
            .map(|(index, hit)| format!("{}. {} ({})\n{}", index + 1, hit.title, hit.url, hit.snippet))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}
