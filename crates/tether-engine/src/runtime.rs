//! The inbound entrypoint: resolve a named tool and run it.

use serde_json::Value;
use std::time::Instant;
use tracing::{info, warn};

use tether_core::identifiers::ToolName;
use tether_core::tool::derive_tool_name;
use tether_core::{ToolError, ToolExecutionContext};

use crate::catalogue::Catalogue;
use crate::executor::ToolExecutor;

/// One turn's dispatch surface: the assembled catalogue plus the stateless
/// executor. Construct per turn; `execute_tool` may be called concurrently
/// for parallel tool calls within the turn.
#[derive(Debug, Clone)]
pub struct ToolRuntime {
    catalogue: Catalogue,
    executor: ToolExecutor,
}

impl ToolRuntime {
    pub fn new(catalogue: Catalogue, executor: ToolExecutor) -> Self {
        Self {
            catalogue,
            executor,
        }
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Execute the named tool with the model's raw arguments.
    ///
    /// The name comes straight off the wire. A name that does not parse,
    /// or parses to something outside the catalogue, is an exposed
    /// `NotFound`: the model referenced a tool it was never offered and
    /// can correct itself.
    pub async fn execute_tool(
        &self,
        name: &str,
        raw_args: &Value,
        context: &ToolExecutionContext,
    ) -> Result<String, ToolError> {
        let started = Instant::now();
        let Some(tool) = ToolName::parse(name)
            .ok()
            .and_then(|parsed| self.catalogue.get(&parsed))
        else {
            warn!(tool = name, "call to unknown tool");
            return Err(unknown_tool(name));
        };
        let name = tool.name();

        let result = self.executor.execute(tool, raw_args, context).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(output) => info!(
                tool = %name,
                elapsed_ms,
                output_chars = output.chars().count(),
                "tool call succeeded"
            ),
            Err(error) => warn!(
                tool = %name,
                elapsed_ms,
                kind = ?error.kind(),
                exposed = error.expose_to_llm(),
                "tool call failed"
            ),
        }
        result
    }
}

/// Error attribution for a wire name that resolved to nothing. The raw
/// string may not be a valid identifier, so the attributed name is its
/// slug; the message carries the string verbatim.
fn unknown_tool(name: &str) -> ToolError {
    ToolError::NotFound {
        tool: derive_tool_name("", name),
        resource: format!("tool '{name}'"),
    }
}
