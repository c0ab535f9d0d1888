//! The tool taxonomy: a closed set of invocable units offered to the model.
//!
//! `ToolKind` is the wire-level discriminator for the catalogue;
//! [`Tool`] is the runtime variant actually dispatched on, carrying the
//! per-turn data (offered skill names, attached source ids, persisted HTTP
//! config, live MCP metadata) that shapes each instance's schema.
//!
//! A `Tool` is owned exclusively by the single execution call that created
//! it. Contextual and ephemeral variants depend on the immediate
//! conversation state, so instances are never cached or shared across
//! turns.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::context::ThreadSnapshot;
use crate::identifiers::{IntegrationId, KnowledgeBaseId, SourceId, ToolName};
use crate::schema::{ObjectSchema, close_object_nodes};
use crate::skill::SkillName;

/// Discriminator for the closed tool catalogue.
///
/// Adding a variant here without teaching the factory and the handler
/// registry about it is a test-detectable defect: the catalogue-coverage
/// test asserts `all()` length and resolves a handler for every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    WebSearch,
    CodeExecution,
    ProductKnowledge,
    ActivateSkill,
    QuerySource,
    GetSourceText,
    KnowledgeSearch,
    GetKnowledgeDocument,
    HttpEndpoint,
    CreateDocument,
    UpdateDocument,
    McpTool,
    McpResource,
}

impl ToolKind {
    /// Get the kind's wire tag as a string.
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::WebSearch => "web_search",
            ToolKind::CodeExecution => "code_execution",
            ToolKind::ProductKnowledge => "product_knowledge",
            ToolKind::ActivateSkill => "activate_skill",
            ToolKind::QuerySource => "query_source",
            ToolKind::GetSourceText => "get_source_text",
            ToolKind::KnowledgeSearch => "knowledge_search",
            ToolKind::GetKnowledgeDocument => "get_knowledge_document",
            ToolKind::HttpEndpoint => "http_endpoint",
            ToolKind::CreateDocument => "create_document",
            ToolKind::UpdateDocument => "update_document",
            ToolKind::McpTool => "mcp_tool",
            ToolKind::McpResource => "mcp_resource",
        }
    }

    /// Try to parse a wire tag into a kind.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "web_search" => Some(ToolKind::WebSearch),
            "code_execution" => Some(ToolKind::CodeExecution),
            "product_knowledge" => Some(ToolKind::ProductKnowledge),
            "activate_skill" => Some(ToolKind::ActivateSkill),
            "query_source" => Some(ToolKind::QuerySource),
            "get_source_text" => Some(ToolKind::GetSourceText),
            "knowledge_search" => Some(ToolKind::KnowledgeSearch),
            "get_knowledge_document" => Some(ToolKind::GetKnowledgeDocument),
            "http_endpoint" => Some(ToolKind::HttpEndpoint),
            "create_document" => Some(ToolKind::CreateDocument),
            "update_document" => Some(ToolKind::UpdateDocument),
            "mcp_tool" => Some(ToolKind::McpTool),
            "mcp_resource" => Some(ToolKind::McpResource),
            _ => None,
        }
    }

    /// Every kind in the catalogue, exactly once.
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::WebSearch,
            ToolKind::CodeExecution,
            ToolKind::ProductKnowledge,
            ToolKind::ActivateSkill,
            ToolKind::QuerySource,
            ToolKind::GetSourceText,
            ToolKind::KnowledgeSearch,
            ToolKind::GetKnowledgeDocument,
            ToolKind::HttpEndpoint,
            ToolKind::CreateDocument,
            ToolKind::UpdateDocument,
            ToolKind::McpTool,
            ToolKind::McpResource,
        ]
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// HTTP method for user-configured endpoint tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Persisted per-user definition of an HTTP endpoint tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpEndpointConfig {
    /// Human-facing name; the tool's wire name is derived from it.
    pub display_name: String,
    pub url: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Short description shown to the model.
    pub description: String,
    /// Optional detailed usage guidance.
    #[serde(default)]
    pub description_long: Option<String>,
    /// Schema for the endpoint's arguments, as declared by the user.
    /// Object nodes are closed before being offered to the model.
    #[serde(default)]
    pub argument_schema: Option<Value>,
}

/// Persisted tool configuration, one variant per configurable kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolConfig {
    HttpEndpoint(HttpEndpointConfig),
}

/// A tool advertised by a live MCP integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpRemoteTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    /// When set, the tool's raw output is kept out of logs.
    #[serde(default)]
    pub returns_sensitive_data: bool,
}

/// A resource advertised by a live MCP integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpRemoteResource {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Live descriptor of an MCP integration, fetched at the start of a turn.
/// Ephemeral tool instances are built from this and discarded with the turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpIntegration {
    pub id: IntegrationId,
    pub display_name: String,
    #[serde(default)]
    pub tools: Vec<McpRemoteTool>,
    #[serde(default)]
    pub resources: Vec<McpRemoteResource>,
}

/// A resource URI bound to the integration that serves it. The resource
/// reader tool carries one binding per advertised resource across all live
/// integrations, so a single tool name covers every readable URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpResourceBinding {
    pub integration_id: IntegrationId,
    pub resource: McpRemoteResource,
}

/// One invocable unit offered to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum Tool {
    WebSearch,
    CodeExecution,
    ProductKnowledge,
    /// Plain tool with a per-turn schema: the `skill_name` enum is exactly
    /// the caller's currently offered skills.
    ActivateSkill { offered: Vec<SkillName> },
    QuerySource { source_ids: Vec<SourceId> },
    GetSourceText { source_ids: Vec<SourceId> },
    KnowledgeSearch { knowledge_base_ids: Vec<KnowledgeBaseId> },
    GetKnowledgeDocument { knowledge_base_ids: Vec<KnowledgeBaseId> },
    /// Configurable: carries a persisted endpoint definition; the wire name
    /// is derived deterministically from the config's display name.
    HttpEndpoint {
        name: ToolName,
        config: HttpEndpointConfig,
    },
    CreateDocument,
    UpdateDocument,
    /// Ephemeral: one instance per remote tool on a live integration.
    McpTool {
        name: ToolName,
        integration_id: IntegrationId,
        remote: McpRemoteTool,
    },
    /// Ephemeral: reads any resource advertised by any live integration.
    /// One instance per turn; bindings route each URI to its integration.
    McpResource { resources: Vec<McpResourceBinding> },
}

impl Tool {
    pub fn kind(&self) -> ToolKind {
        match self {
            Tool::WebSearch => ToolKind::WebSearch,
            Tool::CodeExecution => ToolKind::CodeExecution,
            Tool::ProductKnowledge => ToolKind::ProductKnowledge,
            Tool::ActivateSkill { .. } => ToolKind::ActivateSkill,
            Tool::QuerySource { .. } => ToolKind::QuerySource,
            Tool::GetSourceText { .. } => ToolKind::GetSourceText,
            Tool::KnowledgeSearch { .. } => ToolKind::KnowledgeSearch,
            Tool::GetKnowledgeDocument { .. } => ToolKind::GetKnowledgeDocument,
            Tool::HttpEndpoint { .. } => ToolKind::HttpEndpoint,
            Tool::CreateDocument => ToolKind::CreateDocument,
            Tool::UpdateDocument => ToolKind::UpdateDocument,
            Tool::McpTool { .. } => ToolKind::McpTool,
            Tool::McpResource { .. } => ToolKind::McpResource,
        }
    }

    /// Wire-protocol name, unique within one assembled catalogue.
    pub fn name(&self) -> ToolName {
        match self {
            Tool::HttpEndpoint { name, .. } | Tool::McpTool { name, .. } => name.clone(),
            Tool::McpResource { .. } => ToolName::new_unchecked("read_mcp_resource"),
            other => ToolName::new_unchecked(other.kind().name()),
        }
    }

    /// Short description shown to the model.
    pub fn description(&self) -> &str {
        match self {
            Tool::WebSearch => "Search the web for current information",
            Tool::CodeExecution => "Run code in a sandbox and return its output",
            Tool::ProductKnowledge => "Look up how this product works",
            Tool::ActivateSkill { .. } => {
                "Activate one of your configured skills for this conversation"
            }
            Tool::QuerySource { .. } => "Search within a source attached to this conversation",
            Tool::GetSourceText { .. } => "Read a line range from an attached source",
            Tool::KnowledgeSearch { .. } => "Search a knowledge base",
            Tool::GetKnowledgeDocument { .. } => "Read a line range from a knowledge base document",
            Tool::HttpEndpoint { config, .. } => &config.description,
            Tool::CreateDocument => "Create a new document for the user",
            Tool::UpdateDocument => "Replace the content of an existing document",
            Tool::McpTool { remote, .. } => &remote.description,
            Tool::McpResource { .. } => "Read a resource from a connected integration",
        }
    }

    /// Optional detailed usage guidance.
    pub fn description_long(&self) -> Option<&str> {
        match self {
            Tool::GetSourceText { .. } | Tool::GetKnowledgeDocument { .. } => Some(
                "Reads are bounded: request a line range with start_line and end_line \
                 (end_line of -1 means end of file). Oversized requests fail with a \
                 suggested smaller range.",
            ),
            Tool::ActivateSkill { .. } => Some(
                "Activation attaches the skill's documents and integrations to the \
                 conversation and returns instructions you must follow for the rest \
                 of the turn.",
            ),
            Tool::HttpEndpoint { config, .. } => config.description_long.as_deref(),
            _ => None,
        }
    }

    /// JSON Schema for this tool's arguments. Every object node is closed
    /// with `additionalProperties: false`.
    pub fn parameters(&self) -> Value {
        match self {
            Tool::WebSearch => ObjectSchema::new()
                .string("query", "Search query")
                .optional_integer("max_results", "Maximum number of results", 1, Some(20))
                .build(),
            Tool::CodeExecution => ObjectSchema::new()
                .string("code", "Source code to execute")
                .property(
                    "language",
                    serde_json::json!({
                        "type": "string",
                        "description": "Execution language",
                        "enum": ["python", "javascript"],
                    }),
                )
                .build(),
            Tool::ProductKnowledge => ObjectSchema::new()
                .string("query", "What to look up in the product manual")
                .build(),
            Tool::ActivateSkill { offered } => ObjectSchema::new()
                .string_enum(
                    "skill_name",
                    "Exact name of the skill to activate",
                    offered.iter().map(|name| name.as_str().to_string()),
                )
                .build(),
            Tool::QuerySource { source_ids } => ObjectSchema::new()
                .string_enum(
                    "source_id",
                    "Attached source to search",
                    source_ids.iter().map(|id| id.as_str().to_string()),
                )
                .string("query", "Search query")
                .build(),
            Tool::GetSourceText { source_ids } => ObjectSchema::new()
                .string_enum(
                    "source_id",
                    "Attached source to read",
                    source_ids.iter().map(|id| id.as_str().to_string()),
                )
                .optional_integer("start_line", "First line to read (1-based)", 1, None)
                .optional_integer("end_line", "Last line to read, or -1 for end of file", -1, None)
                .build(),
            Tool::KnowledgeSearch { knowledge_base_ids } => ObjectSchema::new()
                .string_enum(
                    "knowledge_base_id",
                    "Knowledge base to search",
                    knowledge_base_ids.iter().map(|id| id.as_str().to_string()),
                )
                .string("query", "Search query")
                .build(),
            Tool::GetKnowledgeDocument { knowledge_base_ids } => ObjectSchema::new()
                .string_enum(
                    "knowledge_base_id",
                    "Knowledge base the document belongs to",
                    knowledge_base_ids.iter().map(|id| id.as_str().to_string()),
                )
                .string("document_id", "Document to read")
                .optional_integer("start_line", "First line to read (1-based)", 1, None)
                .optional_integer("end_line", "Last line to read, or -1 for end of file", -1, None)
                .build(),
            Tool::HttpEndpoint { config, .. } => config
                .argument_schema
                .clone()
                .map(close_object_nodes)
                .unwrap_or_else(|| ObjectSchema::new().build()),
            Tool::CreateDocument => ObjectSchema::new()
                .string("title", "Document title")
                .string("content", "Full document content")
                .build(),
            Tool::UpdateDocument => ObjectSchema::new()
                .string("artifact_id", "Document to update")
                .string("content", "Replacement content")
                .build(),
            Tool::McpTool { remote, .. } => close_object_nodes(remote.input_schema.clone()),
            Tool::McpResource { resources } => ObjectSchema::new()
                .string_enum(
                    "uri",
                    "Resource to read",
                    resources.iter().map(|binding| binding.resource.uri.clone()),
                )
                .build(),
        }
    }

    /// Whether availability depends on current conversation state.
    pub fn is_contextual(&self) -> bool {
        matches!(
            self,
            Tool::QuerySource { .. }
                | Tool::GetSourceText { .. }
                | Tool::KnowledgeSearch { .. }
                | Tool::GetKnowledgeDocument { .. }
        )
    }

    /// Whether the tool should be surfaced to the model for this turn.
    pub fn is_available(&self, snapshot: &ThreadSnapshot) -> bool {
        match self {
            Tool::QuerySource { .. } | Tool::GetSourceText { .. } => snapshot.has_sources(),
            Tool::KnowledgeSearch { .. } | Tool::GetKnowledgeDocument { .. } => {
                snapshot.has_knowledge_bases()
            }
            // A skill enum with no members would be unsatisfiable.
            Tool::ActivateSkill { offered } => !offered.is_empty(),
            Tool::McpResource { resources } => !resources.is_empty(),
            _ => true,
        }
    }

    /// Rendered client-side as a widget.
    pub fn is_displayable(&self) -> bool {
        matches!(self, Tool::CreateDocument | Tool::UpdateDocument)
    }

    /// Executed server-side. Displayable document tools are hybrids: both
    /// rendered and executed.
    pub fn is_executable(&self) -> bool {
        true
    }

    /// Instantiated per request from a live integration, never persisted.
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, Tool::McpTool { .. } | Tool::McpResource { .. })
    }

    /// Carries a persisted per-user configuration.
    pub fn is_configurable(&self) -> bool {
        matches!(self, Tool::HttpEndpoint { .. })
    }
}

/// Derive a wire-safe tool name from a human-facing display name.
///
/// Deterministic: the same display name always yields the same tool name,
/// so a configured tool keeps its identity across turns.
pub fn derive_tool_name(prefix: &str, display_name: &str) -> ToolName {
    let mut slug = String::with_capacity(prefix.len() + display_name.len() + 1);
    slug.push_str(prefix);
    if !prefix.is_empty() {
        slug.push('_');
    }
    let mut last_was_separator = true;
    for character in display_name.chars() {
        if character.is_ascii_alphanumeric() {
            slug.push(character.to_ascii_lowercase());
            last_was_separator = false;
        } else if !last_was_separator {
            slug.push('_');
            last_was_separator = true;
        }
    }
    let slug = slug.trim_end_matches('_');
    let slug = if slug.is_empty() { "tool" } else { slug };
    let truncated: String = slug.chars().take(crate::identifiers::MAX_ID_LENGTH).collect();
    ToolName::new_unchecked(truncated.trim_end_matches('_').to_string())
}
