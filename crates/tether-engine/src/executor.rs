//! The execute-and-validate pipeline.
//!
//! One stateless component turns a (tool, raw arguments, context) triple
//! into either a string result for the model or a classified [`ToolError`].
//! Validation happens before dispatch, so a handler only ever sees
//! arguments that conform to the tool's declared schema.

use jsonschema::JSONSchema;
use serde_json::Value;
use tracing::debug;

use tether_core::tool::Tool;
use tether_core::{ToolError, ToolExecutionContext};

use crate::registry::{HandlerFailure, HandlerRegistry, Invocation};

/// Stateless executor. Safe to share across concurrent independent calls;
/// there is no cross-call state to contend on.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    registry: HandlerRegistry,
}

impl ToolExecutor {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Run one tool call through the full pipeline:
    /// validate, resolve, invoke, normalize.
    pub async fn execute(
        &self,
        tool: &Tool,
        raw_args: &Value,
        context: &ToolExecutionContext,
    ) -> Result<String, ToolError> {
        let violations = validate_against_schema(&tool.parameters(), raw_args)
            .map_err(|reason| ToolError::internal(tool.name(), reason))?;
        if !violations.is_empty() {
            debug!(
                tool = %tool.name(),
                violation_count = violations.len(),
                "rejecting arguments before dispatch"
            );
            return Err(ToolError::InvalidInput {
                tool: tool.name(),
                violations,
            });
        }

        let handler = self.registry.resolve(tool)?;
        match handler
            .execute(Invocation {
                tool,
                args: raw_args,
                context,
            })
            .await
        {
            Ok(output) => Ok(output),
            // Classified failures pass through untouched; unclassified ones
            // are wrapped exactly once, non-exposed.
            Err(HandlerFailure::Classified(error)) => Err(error),
            Err(HandlerFailure::Unclassified(error)) => {
                Err(ToolError::wrap_unclassified(tool.name(), error))
            }
        }
    }
}

/// Validate `instance` against `schema`, returning one message per
/// violation with its instance path. `Err` means the schema itself did not
/// compile, which is a defect in the tool definition rather than the call.
fn validate_against_schema(schema: &Value, instance: &Value) -> Result<Vec<String>, String> {
    let compiled = JSONSchema::compile(schema)
        .map_err(|error| format!("tool schema failed to compile: {error}"))?;

    match compiled.validate(instance) {
        Ok(()) => Ok(Vec::new()),
        Err(errors) => Ok(errors
            .map(|error| {
                let path = error.instance_path.to_string();
                if path.is_empty() {
                    error.to_string()
                } else {
                    format!("{path}: {error}")
                }
            })
            .collect()),
    }
}
