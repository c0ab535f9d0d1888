//! Per-kind tool handlers.
//!
//! Each handler owns the ports it needs and nothing else. Handlers receive
//! arguments that already passed schema validation; the accessor helpers
//! below treat a missing field after validation as an internal defect, not
//! a model mistake.

use serde_json::Value;
use std::sync::Arc;

use tether_core::identifiers::ToolName;
use tether_core::ToolError;

use crate::config::EngineConfig;
use crate::ports::{
    ArtifactStore, CodeRunner, HttpGateway, McpClient, SearchHit, SearchService, SkillDirectory,
    SourceStore, ThreadStore, WebSearcher,
};
use crate::registry::{HandlerFailure, HandlerRegistry};
use tether_core::tool::ToolKind;

mod code_exec;
mod document;
mod http;
mod knowledge;
mod mcp;
mod skill;
mod source;
mod web_search;

pub use code_exec::CodeExecutionHandler;
pub use document::{CreateDocumentHandler, UpdateDocumentHandler};
pub use http::HttpEndpointHandler;
pub use knowledge::{GetKnowledgeDocumentHandler, KnowledgeSearchHandler, ProductKnowledgeHandler};
pub use mcp::{McpResourceHandler, McpToolHandler};
pub use skill::ActivateSkillHandler;
pub use source::{GetSourceTextHandler, QuerySourceHandler};
pub use web_search::WebSearchHandler;

/// All outbound ports, bundled for registry assembly.
#[derive(Clone)]
pub struct PortSet {
    pub threads: Arc<dyn ThreadStore>,
    pub sources: Arc<dyn SourceStore>,
    pub search: Arc<dyn SearchService>,
    pub skills: Arc<dyn SkillDirectory>,
    pub mcp: Arc<dyn McpClient>,
    pub artifacts: Arc<dyn ArtifactStore>,
    pub http: Arc<dyn HttpGateway>,
    pub code: Arc<dyn CodeRunner>,
    pub web: Arc<dyn WebSearcher>,
}

/// Build a registry covering the whole catalogue.
pub fn build_registry(ports: &PortSet, config: &EngineConfig) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry
        .register(
            ToolKind::WebSearch,
            Arc::new(WebSearchHandler::new(
                ports.web.clone(),
                config.web_search_default_results,
            )),
        )
        .register(
            ToolKind::CodeExecution,
            Arc::new(CodeExecutionHandler::new(
                ports.code.clone(),
                config.code_output_max_chars,
            )),
        )
        .register(
            ToolKind::ProductKnowledge,
            Arc::new(ProductKnowledgeHandler::new(
                ports.search.clone(),
                config.search_top_k,
            )),
        )
        .register(
            ToolKind::ActivateSkill,
            Arc::new(ActivateSkillHandler::new(
                ports.skills.clone(),
                ports.sources.clone(),
                ports.threads.clone(),
            )),
        )
        .register(
            ToolKind::QuerySource,
            Arc::new(QuerySourceHandler::new(
                ports.search.clone(),
                config.search_top_k,
            )),
        )
        .register(
            ToolKind::GetSourceText,
            Arc::new(GetSourceTextHandler::new(
                ports.sources.clone(),
                config.extraction,
            )),
        )
        .register(
            ToolKind::KnowledgeSearch,
            Arc::new(KnowledgeSearchHandler::new(
                ports.search.clone(),
                config.search_top_k,
            )),
        )
        .register(
            ToolKind::GetKnowledgeDocument,
            Arc::new(GetKnowledgeDocumentHandler::new(
                ports.search.clone(),
                config.extraction,
            )),
        )
        .register(
            ToolKind::HttpEndpoint,
            Arc::new(HttpEndpointHandler::new(ports.http.clone())),
        )
        .register(
            ToolKind::CreateDocument,
            Arc::new(CreateDocumentHandler::new(ports.artifacts.clone())),
        )
        .register(
            ToolKind::UpdateDocument,
            Arc::new(UpdateDocumentHandler::new(ports.artifacts.clone())),
        )
        .register(
            ToolKind::McpTool,
            Arc::new(McpToolHandler::new(ports.mcp.clone())),
        )
        .register(
            ToolKind::McpResource,
            Arc::new(McpResourceHandler::new(ports.mcp.clone())),
        );
    registry
}

/// A string field guaranteed present by schema validation.
pub(crate) fn require_str<'a>(
    args: &'a Value,
    key: &str,
    tool: &ToolName,
) -> Result<&'a str, HandlerFailure> {
    args.get(key).and_then(Value::as_str).ok_or_else(|| {
        ToolError::internal(
            tool.clone(),
            format!("validated arguments missing string field '{key}'"),
        )
        .into()
    })
}

pub(crate) fn optional_i64(args: &Value, key: &str) -> Option<i64> {
    args.get(key).and_then(Value::as_i64)
}

pub(crate) fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

/// Render semantic hits the way the model expects them: numbered, title
/// then snippet, or an explicit no-results line.
pub(crate) fn render_search_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No results.".to_string();
    }
    hits.iter()
        .enumerate()
        .map(|(index, hit)| format!("{}. {}\n{}", index + 1, hit.title, hit.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}
