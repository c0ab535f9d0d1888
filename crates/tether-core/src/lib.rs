//! # Tether Core
//!
//! Core types for the Tether tool dispatch engine: the tool taxonomy,
//! validated identifiers, the skill model, bounded text extraction, and
//! the error taxonomy that decides which failures are replayed to the model.

pub mod context;
pub mod error;
pub mod extract;
pub mod identifiers;
pub mod schema;
pub mod skill;
pub mod tool;

pub use context::{ThreadSnapshot, ToolExecutionContext};
pub use error::{ToolError, ToolErrorKind, ToolResult};
pub use extract::{ExtractError, Extraction, ExtractionLimits, extract_lines};
pub use identifiers::{
    ArtifactId, IdValidationError, IntegrationId, KnowledgeBaseId, OrgId, SkillId, SourceId,
    ThreadId, ToolName,
};
pub use skill::{InvalidSkillName, Skill, SkillName};
pub use tool::{
    HttpEndpointConfig, HttpMethod, McpIntegration, McpRemoteResource, McpRemoteTool,
    McpResourceBinding, Tool, ToolConfig, ToolKind, derive_tool_name,
};
