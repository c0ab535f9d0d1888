//! Handlers bridging to live MCP integrations.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use tether_core::ToolError;
use tether_core::tool::Tool;

use crate::ports::McpClient;
use crate::registry::{HandlerFailure, Invocation, ToolHandler};

use super::require_str;

/// Forwards a call to the remote tool the instance was built from.
pub struct McpToolHandler {
    mcp: Arc<dyn McpClient>,
}

impl McpToolHandler {
    pub fn new(mcp: Arc<dyn McpClient>) -> Self {
        Self { mcp }
    }
}

#[async_trait]
impl ToolHandler for McpToolHandler {
    async fn execute(&self, invocation: Invocation<'_>) -> Result<String, HandlerFailure> {
        let tool_name = invocation.tool.name();
        let Tool::McpTool {
            integration_id,
            remote,
            ..
        } = invocation.tool
        else {
            return Err(ToolError::internal(
                tool_name,
                "mcp tool handler bound to a non-mcp tool",
            )
            .into());
        };

        let result = self
            .mcp
            .call_tool(integration_id, &remote.name, invocation.args.clone())
            .await
            .map_err(|error| error.classify(&tool_name))?;

        // Sensitive payloads stay out of logs entirely.
        if remote.returns_sensitive_data {
            debug!(tool = %tool_name, integration = %integration_id, "remote tool returned (payload withheld)");
        } else {
            debug!(
                tool = %tool_name,
                integration = %integration_id,
                payload_chars = result.to_string().chars().count(),
                "remote tool returned"
            );
        }

        serde_json::to_string_pretty(&result).map_err(HandlerFailure::from)
    }
}

/// Reads one resource advertised by a live integration.
pub struct McpResourceHandler {
    mcp: Arc<dyn McpClient>,
}

impl McpResourceHandler {
    pub fn new(mcp: Arc<dyn McpClient>) -> Self {
        Self { mcp }
    }
}

#[async_trait]
impl ToolHandler for McpResourceHandler {
    async fn execute(&self, invocation: Invocation<'_>) -> Result<String, HandlerFailure> {
        let tool_name = invocation.tool.name();
        let Tool::McpResource { resources } = invocation.tool else {
            return Err(ToolError::internal(
                tool_name,
                "mcp resource handler bound to a non-mcp tool",
            )
            .into());
        };
        let uri = require_str(invocation.args, "uri", &tool_name)?;

        // The schema enum keeps the URI inside the advertised set; the
        // binding routes it to the integration that serves it.
        let binding = resources
            .iter()
            .find(|binding| binding.resource.uri == uri)
            .ok_or_else(|| ToolError::NotFound {
                tool: tool_name.clone(),
                resource: format!("resource '{uri}'"),
            })?;

        self.mcp
            .read_resource(&binding.integration_id, uri)
            .await
            .map_err(|error| error.classify(&tool_name))
            .map_err(HandlerFailure::from)
    }
}
