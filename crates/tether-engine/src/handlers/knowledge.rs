//! Handlers over knowledge bases and the built-in product manual.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use tether_core::ToolError;
use tether_core::extract::{END_OF_FILE, ExtractionLimits, extract_lines};
use tether_core::identifiers::KnowledgeBaseId;

use crate::ports::{SearchScope, SearchService};
use crate::registry::{HandlerFailure, Invocation, ToolHandler};

use super::{optional_i64, render_search_hits, require_str};

/// Semantic search over one knowledge base.
pub struct KnowledgeSearchHandler {
    search: Arc<dyn SearchService>,
    top_k: usize,
}

impl KnowledgeSearchHandler {
    pub fn new(search: Arc<dyn SearchService>, top_k: usize) -> Self {
        Self { search, top_k }
    }
}

#[async_trait]
impl ToolHandler for KnowledgeSearchHandler {
    async fn execute(&self, invocation: Invocation<'_>) -> Result<String, HandlerFailure> {
        let tool_name = invocation.tool.name();
        let knowledge_base_id = parse_knowledge_base_id(&invocation)?;
        let query = require_str(invocation.args, "query", &tool_name)?;

        let hits = self
            .search
            .semantic_query(
                &invocation.context.org_id,
                &SearchScope::KnowledgeBase(knowledge_base_id),
                query,
                self.top_k,
            )
            .await
            .map_err(|error| error.classify(&tool_name))?;
        debug!(tool = %tool_name, hit_count = hits.len(), "knowledge search completed");
        Ok(render_search_hits(&hits))
    }
}

/// Bounded read of one knowledge base document.
pub struct GetKnowledgeDocumentHandler {
    search: Arc<dyn SearchService>,
    limits: ExtractionLimits,
}

impl GetKnowledgeDocumentHandler {
    pub fn new(search: Arc<dyn SearchService>, limits: ExtractionLimits) -> Self {
        Self { search, limits }
    }
}

#[async_trait]
impl ToolHandler for GetKnowledgeDocumentHandler {
    async fn execute(&self, invocation: Invocation<'_>) -> Result<String, HandlerFailure> {
        let tool_name = invocation.tool.name();
        let knowledge_base_id = parse_knowledge_base_id(&invocation)?;
        let document_id = require_str(invocation.args, "document_id", &tool_name)?;
        let start_line = optional_i64(invocation.args, "start_line").unwrap_or(1).max(0) as usize;
        let end_line = optional_i64(invocation.args, "end_line").unwrap_or(END_OF_FILE);

        let text = self
            .search
            .document_text(&invocation.context.org_id, &knowledge_base_id, document_id)
            .await
            .map_err(|error| error.classify(&tool_name))?;

        let extraction = extract_lines(&text, start_line, end_line, &self.limits)
            .map_err(|error| ToolError::exposed(tool_name.clone(), error.to_string()))?;

        if extraction.is_empty {
            return Ok(format!("Document {document_id} is empty."));
        }
        Ok(format!(
            "{} (lines {}-{} of {})\n{}",
            document_id,
            extraction.effective_start_line,
            extraction.effective_end_line,
            extraction.total_lines,
            extraction.text
        ))
    }
}

/// Semantic search against the built-in product manual.
pub struct ProductKnowledgeHandler {
    search: Arc<dyn SearchService>,
    top_k: usize,
}

impl ProductKnowledgeHandler {
    pub fn new(search: Arc<dyn SearchService>, top_k: usize) -> Self {
        Self { search, top_k }
    }
}

#[async_trait]
impl ToolHandler for ProductKnowledgeHandler {
    async fn execute(&self, invocation: Invocation<'_>) -> Result<String, HandlerFailure> {
        let tool_name = invocation.tool.name();
        let query = require_str(invocation.args, "query", &tool_name)?;

        let hits = self
            .search
            .semantic_query(
                &invocation.context.org_id,
                &SearchScope::ProductManual,
                query,
                self.top_k,
            )
            .await
            .map_err(|error| error.classify(&tool_name))?;
        Ok(render_search_hits(&hits))
    }
}

fn parse_knowledge_base_id(invocation: &Invocation<'_>) -> Result<KnowledgeBaseId, HandlerFailure> {
    let tool_name = invocation.tool.name();
    let raw = require_str(invocation.args, "knowledge_base_id", &tool_name)?;
    KnowledgeBaseId::parse(raw).map_err(|error| {
        ToolError::exposed(tool_name, format!("invalid knowledge base id '{raw}': {error}")).into()
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
    use tether_engine::handlers::{
        GetKnowledgeDocumentHandler, KnowledgeSearchHandler, ProductKnowledgeHandler,
    };
    use tether_engine::ports::SearchScope;
    use tether_engine::registry::{HandlerFailure, Invocation, ToolHandler};
    use tether_testing::ScriptedSearchService;

    fn context() -> ToolExecutionContext {
        ToolExecutionContext::new(
            OrgId::new_unchecked("org-1"),
            ThreadId::new_unchecked("thread-1"),
        )
    }

    #[tokio::test]
    async fn document_read_flows_through_extraction() {
        let search = Arc::new(ScriptedSearchService::new().with_document(
            "kb-1",
            "doc-7",
            "one\ntwo\nthree",
        ));
        let handler = GetKnowledgeDocumentHandler::new(search, ExtractionLimits::default());
        let tool = Tool::GetKnowledgeDocument {
            knowledge_base_ids: vec![KnowledgeBaseId::new_unchecked("kb-1")],
        };
        let args = json!({ "knowledge_base_id": "kb-1", "document_id": "doc-7", "end_line": 2 });
        let ctx = context();

        let output = handler
            .execute(Invocation {
                tool: &tool,
                args: &args,
                context: &ctx,
            })
            .await
            .unwrap();
        assert_eq!(output, "doc-7 (lines 1-2 of 3)\none\ntwo");
    }

    #[tokio::test]
    async fn missing_document_is_not_found() {
        let search = Arc::new(ScriptedSearchService::new());
        let handler = GetKnowledgeDocumentHandler::new(search, ExtractionLimits::default());
        let tool = Tool::GetKnowledgeDocument {
            knowledge_base_ids: vec![KnowledgeBaseId::new_unchecked("kb-1")],
        };
        let args = json!({ "knowledge_base_id": "kb-1", "document_id": "missing" });
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
                assert!(error.expose_to_llm());
            }
            other => panic!("expected classified failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn domain_refusal_is_replayed_verbatim() {
        let search = Arc::new(ScriptedSearchService::new().with_domain_failure(
            "this knowledge base uses a different embedding model",
        ));
        let handler = KnowledgeSearchHandler::new(search, 8);
        let tool = Tool::KnowledgeSearch {
            knowledge_base_ids: vec![KnowledgeBaseId::new_unchecked("kb-1")],
        };
        let args = json!({ "knowledge_base_id": "kb-1", "query": "pricing" });
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
                assert!(error.model_message().contains("embedding model"));
            }
            other => panic!("expected classified failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn product_knowledge_searches_the_manual_scope() {
        let search = Arc::new(
            ScriptedSearchService::new().with_hit("Exports", "Use the export menu"),
        );
        let handler = ProductKnowledgeHandler::new(search.clone(), 8);
        let tool = Tool::ProductKnowledge;
        let args = json!({ "query": "how do I export" });
        let ctx = context();

        let output = handler
            .execute(Invocation {
                tool: &tool,
                args: &args,
                context: &ctx,
            })
            .await
            .unwrap();
        assert!(output.contains("Exports"));
        assert_eq!(
            search.last_scope(),
            Some(SearchScope::ProductManual)
        );
    }
}
