//! Handlers over sources attached to the conversation.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use tether_core::ToolError;
use tether_core::extract::{END_OF_FILE, ExtractionLimits, extract_lines};
use tether_core::identifiers::SourceId;

use crate::ports::{SearchScope, SearchService, SourceStore};
use crate::registry::{HandlerFailure, Invocation, ToolHandler};

use super::{optional_i64, render_search_hits, require_str};

/// Semantic search scoped to a single attached source.
pub struct QuerySourceHandler {
    search: Arc<dyn SearchService>,
    top_k: usize,
}

impl QuerySourceHandler {
    pub fn new(search: Arc<dyn SearchService>, top_k: usize) -> Self {
        Self { search, top_k }
    }
}

#[async_trait]
impl ToolHandler for QuerySourceHandler {
    async fn execute(&self, invocation: Invocation<'_>) -> Result<String, HandlerFailure> {
        let tool_name = invocation.tool.name();
        let source_id = parse_source_id(&invocation)?;
        let query = require_str(invocation.args, "query", &tool_name)?;

        let hits = self
            .search
            .semantic_query(
                &invocation.context.org_id,
                &SearchScope::Source(source_id),
                query,
                self.top_k,
            )
            .await
            .map_err(|error| error.classify(&tool_name))?;
        debug!(tool = %tool_name, hit_count = hits.len(), "source query completed");
        Ok(render_search_hits(&hits))
    }
}

/// Bounded raw-text read from an attached source.
pub struct GetSourceTextHandler {
    sources: Arc<dyn SourceStore>,
    limits: ExtractionLimits,
}

impl GetSourceTextHandler {
    pub fn new(sources: Arc<dyn SourceStore>, limits: ExtractionLimits) -> Self {
        Self { sources, limits }
    }
}

#[async_trait]
impl ToolHandler for GetSourceTextHandler {
    async fn execute(&self, invocation: Invocation<'_>) -> Result<String, HandlerFailure> {
        let tool_name = invocation.tool.name();
        let source_id = parse_source_id(&invocation)?;
        let start_line = optional_i64(invocation.args, "start_line").unwrap_or(1).max(0) as usize;
        let end_line = optional_i64(invocation.args, "end_line").unwrap_or(END_OF_FILE);

        let source = self
            .sources
            .fetch(&invocation.context.org_id, &source_id)
            .await
            .map_err(|error| error.classify(&tool_name))?;

        let extraction = extract_lines(&source.text, start_line, end_line, &self.limits)
            .map_err(|error| ToolError::exposed(tool_name.clone(), error.to_string()))?;

        if extraction.is_empty {
            return Ok(format!("{} is empty.", source.title));
        }
        Ok(format!(
            "{} (lines {}-{} of {})\n{}",
            source.title,
            extraction.effective_start_line,
            extraction.effective_end_line,
            extraction.total_lines,
            extraction.text
        ))
    }
}

fn parse_source_id(invocation: &Invocation<'_>) -> Result<SourceId, HandlerFailure> {
    let tool_name = invocation.tool.name();
    let raw = require_str(invocation.args, "source_id", &tool_name)?;
    SourceId::parse(raw).map_err(|error| {
        ToolError::exposed(tool_name, format!("invalid source id '{raw}': {error}")).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tether_core::identifiers::{OrgId, ThreadId};
    use tether_core::tool::Tool;
    use tether_core::{ToolErrorKind, ToolExecutionContext};
    // Shadow crate-local items with the external `tether_engine` build that
    // the `tether_testing` fakes implement traits for (dev-dep cycle).
    use tether_engine::handlers::{GetSourceTextHandler, QuerySourceHandler};
    use tether_engine::registry::{HandlerFailure, Invocation, ToolHandler};
    use tether_testing::{InMemorySourceStore, ScriptedSearchService};

    fn context() -> ToolExecutionContext {
        ToolExecutionContext::new(
            OrgId::new_unchecked("org-1"),
            ThreadId::new_unchecked("thread-1"),
        )
    }

    fn source_tool() -> Tool {
        Tool::GetSourceText {
            source_ids: vec![SourceId::new_unchecked("src-1")],
        }
    }

    #[tokio::test]
    async fn reads_a_framed_line_range() {
        let sources = Arc::new(InMemorySourceStore::new().with_source(
            "src-1",
            "Q3 Budget",
            "alpha\nbeta\ngamma\ndelta",
        ));
        let handler = GetSourceTextHandler::new(sources, ExtractionLimits::default());
        let tool = source_tool();
        let args = json!({ "source_id": "src-1", "start_line": 2, "end_line": 3 });
        let ctx = context();

        let output = handler
            .execute(Invocation {
                tool: &tool,
                args: &args,
                context: &ctx,
            })
            .await
            .unwrap();
        assert_eq!(output, "Q3 Budget (lines 2-3 of 4)\nbeta\ngamma");
    }

    #[tokio::test]
    async fn empty_source_reads_as_explicit_empty() {
        let sources = Arc::new(InMemorySourceStore::new().with_source("src-1", "Empty Doc", ""));
        let handler = GetSourceTextHandler::new(sources, ExtractionLimits::default());
        let tool = source_tool();
        let args = json!({ "source_id": "src-1" });
        let ctx = context();

        let output = handler
            .execute(Invocation {
                tool: &tool,
                args: &args,
                context: &ctx,
            })
            .await
            .unwrap();
        assert_eq!(output, "Empty Doc is empty.");
    }

    #[tokio::test]
    async fn oversized_span_surfaces_the_retry_suggestion() {
        let text = (1..=20).map(|i| format!("L{i}")).collect::<Vec<_>>().join("\n");
        let sources = Arc::new(InMemorySourceStore::new().with_source("src-1", "Long Doc", text));
        let handler = GetSourceTextHandler::new(
            sources,
            ExtractionLimits {
                max_lines: 5,
                max_chars: 50_000,
            },
        );
        let tool = source_tool();
        let args = json!({ "source_id": "src-1" });
        let ctx = context();

        let err = handler
            .execute(Invocation {
                tool: &tool,
                args: &args,
                context: &ctx,
            })
            .await
            .unwrap_err();
        match err {
            HandlerFailure::Classified(error) => {
                assert!(error.expose_to_llm());
                assert!(error.model_message().contains("lines 1 to 5"));
            }
            other => panic!("expected classified failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_source_is_not_found() {
        let sources = Arc::new(InMemorySourceStore::new());
        let handler = GetSourceTextHandler::new(sources, ExtractionLimits::default());
        let tool = source_tool();
        let args = json!({ "source_id": "src-1" });
        let ctx = context();

        let err = handler
            .execute(Invocation {
                tool: &tool,
                args: &args,
                context: &ctx,
            })
            .await
            .unwrap_err();
        match err {
            HandlerFailure::Classified(error) => {
                assert_eq!(error.kind(), ToolErrorKind::NotFound);
            }
            other => panic!("expected classified failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn query_renders_numbered_hits() {
        let search = Arc::new(
            ScriptedSearchService::new()
                .with_hit("Budget overview", "Total spend is 1.2M")
                .with_hit("Forecast", "Q4 projection"),
        );
        let handler = QuerySourceHandler::new(search, 8);
        let tool = Tool::QuerySource {
            source_ids: vec![SourceId::new_unchecked("src-1")],
        };
        let args = json!({ "source_id": "src-1", "query": "spend" });
        let ctx = context();

        let output = handler
            .execute(Invocation {
                tool: &tool,
                args: &args,
                context: &ctx,
            })
            .await
            .unwrap();
        assert!(output.starts_with("1. Budget overview"));
        assert!(output.contains("2. Forecast"));
    }

    #[tokio::test]
    async fn query_with_no_hits_says_so() {
        let search = Arc::new(ScriptedSearchService::new());
        let handler = QuerySourceHandler::new(search, 8);
        let tool = Tool::QuerySource {
            source_ids: vec![SourceId::new_unchecked("src-1")],
        };
        let args = json!({ "source_id": "src-1", "query": "anything" });
        let ctx = context();

        let output = handler
            .execute(Invocation {
                tool: &tool,
                args: &args,
                context: &ctx,
            })
            .await
            .unwrap();
        assert_eq!(output, "No results.");
    }
}
