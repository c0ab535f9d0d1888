//! Outbound ports: the narrow async interfaces the handlers call through.
//!
//! Production implementations (vector search, MCP transport, HTTP client,
//! sandbox) live outside this crate; `tether-testing` ships in-memory fakes
//! for all of them. Each trait is deliberately small so a handler's
//! dependencies are visible in its constructor.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use tether_core::identifiers::{
    ArtifactId, IntegrationId, KnowledgeBaseId, OrgId, SourceId, ThreadId, ToolName,
};
use tether_core::skill::{Skill, SkillName};
use tether_core::tool::HttpMethod;
use tether_core::ToolError;

/// Failure of an outbound port call, classified by the adapter that knows
/// what happened. The classification decides model exposure when the
/// failure crosses the pipeline boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    /// The referenced resource does not exist (or is not visible to the
    /// calling org). Exposed so the model can fix its reference.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// A domain-level refusal with actionable guidance, e.g. a knowledge
    /// base indexed under a different embedding model. Exposed verbatim.
    #[error("{message}")]
    Domain { message: String },

    /// Infrastructure failure or timeout. The message stays server-side.
    #[error("{message}")]
    Unavailable { message: String },
}

impl PortError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        PortError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn domain(message: impl Into<String>) -> Self {
        PortError::Domain {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        PortError::Unavailable {
            message: message.into(),
        }
    }

    /// Classify this port failure as a [`ToolError`] attributed to `tool`.
    pub fn classify(self, tool: &ToolName) -> ToolError {
        match self {
            PortError::NotFound { resource } => ToolError::NotFound {
                tool: tool.clone(),
                resource,
            },
            PortError::Domain { message } => ToolError::exposed(tool.clone(), message),
            PortError::Unavailable { message } => ToolError::internal(tool.clone(), message),
        }
    }
}

#[cfg(test)]
mod classify_tests {
    use super::*;
    use tether_core::ToolErrorKind;

    #[test]
    fn not_found_maps_to_exposed_not_found() {
        let err = PortError::not_found("source 'src-9'")
            .classify(&ToolName::new_unchecked("query_source"));
        assert_eq!(err.kind(), ToolErrorKind::NotFound);
        assert!(err.expose_to_llm());
    }

    #[test]
    fn domain_failure_is_exposed_verbatim() {
        let err = PortError::domain("knowledge base uses a different embedding model")
            .classify(&ToolName::new_unchecked("knowledge_search"));
        assert!(err.expose_to_llm());
        assert!(err.model_message().contains("embedding model"));
    }

    #[test]
    fn unavailable_stays_server_side() {
        let err = PortError::unavailable("connection timed out after 30s")
            .classify(&ToolName::new_unchecked("web_search"));
        assert!(!err.expose_to_llm());
        assert!(!err.model_message().contains("timed out"));
    }
}

/// Failure attaching a resource to a thread.
///
/// `AlreadyAttached` is its own variant so callers that want idempotent
/// semantics can match it precisely instead of pattern-matching message
/// text on a generic error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachError {
    #[error("resource is already attached to this thread")]
    AlreadyAttached,

    #[error("attachment failed: {message}")]
    Failed { message: String },
}

/// A document/source attachable to a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub id: SourceId,
    pub title: String,
    pub text: String,
}

/// Persisted conversation state as the thread store sees it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Thread {
    pub id: Option<ThreadId>,
    pub source_ids: Vec<SourceId>,
    pub integration_ids: Vec<IntegrationId>,
    pub knowledge_base_ids: Vec<KnowledgeBaseId>,
}

/// One semantic search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub score: f64,
}

/// One web search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// What a semantic query runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    Source(SourceId),
    KnowledgeBase(KnowledgeBaseId),
    /// The built-in product manual.
    ProductManual,
}

/// Outbound HTTP request assembled from a configured endpoint tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOutcall {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    /// The model's validated arguments; the gateway decides how they map
    /// onto the request (query string for GET, JSON body otherwise).
    pub arguments: Value,
}

/// What the gateway reports back from an outcall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponseSummary {
    pub status: u16,
    pub body: String,
}

/// Result of one sandboxed code run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRunOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Fetches source documents by id, scoped to the calling org.
#[async_trait]
pub trait SourceStore: Send + Sync {
    async fn fetch(&self, org: &OrgId, source_id: &SourceId) -> Result<Source, PortError>;
}

/// Reads and mutates thread attachment state.
#[async_trait]
pub trait ThreadStore: Send + Sync {
    async fn fetch(&self, org: &OrgId, thread_id: &ThreadId) -> Result<Thread, PortError>;

    async fn attach_source(
        &self,
        thread_id: &ThreadId,
        source_id: &SourceId,
    ) -> Result<(), AttachError>;

    async fn attach_integration(
        &self,
        thread_id: &ThreadId,
        integration_id: &IntegrationId,
    ) -> Result<(), AttachError>;
}

/// Semantic retrieval over sources, knowledge bases, and the product manual.
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn semantic_query(
        &self,
        org: &OrgId,
        scope: &SearchScope,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, PortError>;

    /// Raw text of a knowledge base document, for bounded extraction.
    async fn document_text(
        &self,
        org: &OrgId,
        knowledge_base_id: &KnowledgeBaseId,
        document_id: &str,
    ) -> Result<String, PortError>;
}

/// Resolves skills by exact name.
#[async_trait]
pub trait SkillDirectory: Send + Sync {
    /// Skills owned by the calling org.
    async fn find_owned(&self, org: &OrgId, name: &SkillName)
    -> Result<Option<Skill>, PortError>;

    /// Skills shared with the calling org.
    async fn find_shared(
        &self,
        org: &OrgId,
        name: &SkillName,
    ) -> Result<Option<Skill>, PortError>;
}

/// Forwards calls to a live MCP integration.
#[async_trait]
pub trait McpClient: Send + Sync {
    async fn call_tool(
        &self,
        integration_id: &IntegrationId,
        remote_name: &str,
        arguments: Value,
    ) -> Result<Value, PortError>;

    async fn read_resource(
        &self,
        integration_id: &IntegrationId,
        uri: &str,
    ) -> Result<String, PortError>;
}

/// Persists documents produced by the document tools.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn create(
        &self,
        org: &OrgId,
        thread_id: &ThreadId,
        title: &str,
        content: &str,
    ) -> Result<ArtifactId, PortError>;

    async fn update(
        &self,
        org: &OrgId,
        artifact_id: &ArtifactId,
        content: &str,
    ) -> Result<(), PortError>;
}

/// Sends configured endpoint outcalls. Timeouts are the gateway's concern
/// and surface as [`PortError::Unavailable`].
#[async_trait]
pub trait HttpGateway: Send + Sync {
    async fn send(&self, outcall: HttpOutcall) -> Result<HttpResponseSummary, PortError>;
}

/// Runs model-written code in a sandbox.
#[async_trait]
pub trait CodeRunner: Send + Sync {
    async fn run(&self, language: &str, source: &str) -> Result<CodeRunOutcome, PortError>;
}

/// Searches the public web.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebHit>, PortError>;
}
