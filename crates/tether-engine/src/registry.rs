//! Handler registration and resolution.
//!
//! Dispatch is keyed by [`ToolKind`], the stable tag derived from a tool's
//! runtime variant: two differently-configured HTTP endpoint tools resolve
//! to the same handler, which reads the per-instance config off the tool
//! itself. A missing registration is a configuration defect and fails the
//! call loudly; it is never a silent no-op.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use tether_core::tool::{Tool, ToolKind};
use tether_core::{ToolError, ToolExecutionContext};

/// Boxed error for failures a handler cannot classify itself.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One validated tool call, borrowed for the duration of the handler run.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub tool: &'a Tool,
    /// Arguments already validated against `tool.parameters()`.
    pub args: &'a Value,
    pub context: &'a ToolExecutionContext,
}

/// What a handler returns on failure.
///
/// A handler that knows what went wrong classifies at the throw site; one
/// that hit something unexpected bubbles the raw error and lets the
/// pipeline wrap it, exactly once, as a non-exposed execution failure.
#[derive(Debug)]
pub enum HandlerFailure {
    Classified(ToolError),
    Unclassified(BoxError),
}

impl From<ToolError> for HandlerFailure {
    fn from(error: ToolError) -> Self {
        HandlerFailure::Classified(error)
    }
}

impl From<BoxError> for HandlerFailure {
    fn from(error: BoxError) -> Self {
        HandlerFailure::Unclassified(error)
    }
}

impl From<serde_json::Error> for HandlerFailure {
    fn from(error: serde_json::Error) -> Self {
        HandlerFailure::Unclassified(Box::new(error))
    }
}

/// An executable tool implementation.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn execute(&self, invocation: Invocation<'_>) -> Result<String, HandlerFailure>;
}

impl std::fmt::Debug for dyn ToolHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ToolHandler")
    }
}

/// Registration map from tool kind to handler.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<ToolKind, Arc<dyn ToolHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a kind, replacing any previous registration.
    pub fn register(&mut self, kind: ToolKind, handler: Arc<dyn ToolHandler>) -> &mut Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn is_registered(&self, kind: ToolKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Resolve the handler for a tool's runtime variant.
    pub fn resolve(&self, tool: &Tool) -> Result<Arc<dyn ToolHandler>, ToolError> {
        self.handlers
            .get(&tool.kind())
            .cloned()
            .ok_or_else(|| ToolError::HandlerNotFound { tool: tool.name() })
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
