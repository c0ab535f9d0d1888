//! Error taxonomy for tool execution.
//!
//! Every failure that escapes the execute-tool pipeline is a [`ToolError`],
//! classified once at the site that knows whether the message is safe and
//! useful for the model. The `expose_to_llm` decision travels with the
//! value: exposed errors are replayed verbatim into the model's next turn
//! so it can self-correct; non-exposed errors are replaced by a generic
//! message at the boundary, with the original detail retained for logs.

use thiserror::Error;

use crate::identifiers::ToolName;

/// Generic replacement shown to the model for non-exposed failures.
pub const GENERIC_FAILURE_MESSAGE: &str = "Tool execution failed.";

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Discriminator for the sealed error hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolErrorKind {
    HandlerNotFound,
    InvalidInput,
    NotFound,
    ExecutionFailed,
}

/// A classified tool failure.
///
/// Created at the throw site inside a handler or the pipeline, caught once
/// at the pipeline boundary, never re-wrapped twice.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    /// No handler registered for the tool's runtime variant. A fatal
    /// configuration defect, never exposed to the model.
    #[error("no handler registered for tool '{tool}'")]
    HandlerNotFound { tool: ToolName },

    /// Raw arguments failed schema validation. Always exposed: the
    /// violations are actionable for the model.
    #[error("invalid input for tool '{tool}': {}", violations.join("; "))]
    InvalidInput {
        tool: ToolName,
        violations: Vec<String>,
    },

    /// A referenced resource (skill, source, knowledge base) is absent.
    /// Exposed so the model can adjust its reference.
    #[error("tool '{tool}': {resource} not found")]
    NotFound { tool: ToolName, resource: String },

    /// Execution failed. Exposure is decided per failure site; wrapping an
    /// unclassified error defaults to non-exposed with the original message
    /// preserved in `detail` for server-side logs only.
    #[error("tool '{tool}' execution failed: {message}")]
    ExecutionFailed {
        tool: ToolName,
        message: String,
        expose_to_llm: bool,
        detail: Option<String>,
    },
}

impl ToolError {
    /// Wrap an unclassified failure. Non-exposed by default; the original
    /// message survives only in `detail`.
    pub fn wrap_unclassified(tool: ToolName, source: impl std::fmt::Display) -> Self {
        ToolError::ExecutionFailed {
            tool,
            message: GENERIC_FAILURE_MESSAGE.to_string(),
            expose_to_llm: false,
            detail: Some(source.to_string()),
        }
    }

    /// An execution failure whose message is safe to replay to the model.
    pub fn exposed(tool: ToolName, message: impl Into<String>) -> Self {
        ToolError::ExecutionFailed {
            tool,
            message: message.into(),
            expose_to_llm: true,
            detail: None,
        }
    }

    /// An execution failure whose message must stay server-side.
    pub fn internal(tool: ToolName, message: impl Into<String>) -> Self {
        let message = message.into();
        ToolError::ExecutionFailed {
            tool,
            message: GENERIC_FAILURE_MESSAGE.to_string(),
            expose_to_llm: false,
            detail: Some(message),
        }
    }

    pub fn kind(&self) -> ToolErrorKind {
        match self {
            ToolError::HandlerNotFound { .. } => ToolErrorKind::HandlerNotFound,
            ToolError::InvalidInput { .. } => ToolErrorKind::InvalidInput,
            ToolError::NotFound { .. } => ToolErrorKind::NotFound,
            ToolError::ExecutionFailed { .. } => ToolErrorKind::ExecutionFailed,
        }
    }

    /// Whether this failure's message is intended for the model's context.
    pub fn expose_to_llm(&self) -> bool {
        match self {
            ToolError::HandlerNotFound { .. } => false,
            ToolError::InvalidInput { .. } | ToolError::NotFound { .. } => true,
            ToolError::ExecutionFailed { expose_to_llm, .. } => *expose_to_llm,
        }
    }

    /// The tool this failure is attributed to.
    pub fn tool_name(&self) -> &ToolName {
        match self {
            ToolError::HandlerNotFound { tool }
            | ToolError::InvalidInput { tool, .. }
            | ToolError::NotFound { tool, .. }
            | ToolError::ExecutionFailed { tool, .. } => tool,
        }
    }

    /// The message fed back to the model: verbatim for exposed failures,
    /// the generic replacement otherwise.
    pub fn model_message(&self) -> String {
        if self.expose_to_llm() {
            self.to_string()
        } else {
            GENERIC_FAILURE_MESSAGE.to_string()
        }
    }
}
