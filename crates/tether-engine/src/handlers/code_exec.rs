//! Sandboxed code execution handler.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::ports::CodeRunner;
use crate::registry::{HandlerFailure, Invocation, ToolHandler};

use super::{optional_str, require_str};

const DEFAULT_LANGUAGE: &str = "python";
const TRUNCATION_NOTE: &str = "\n[output truncated]";

pub struct CodeExecutionHandler {
    runner: Arc<dyn CodeRunner>,
    max_output_chars: usize,
}

impl CodeExecutionHandler {
    pub fn new(runner: Arc<dyn CodeRunner>, max_output_chars: usize) -> Self {
        Self {
            runner,
            max_output_chars,
        }
    }
}

#[async_trait]
impl ToolHandler for CodeExecutionHandler {
    async fn execute(&self, invocation: Invocation<'_>) -> Result<String, HandlerFailure> {
        let tool_name = invocation.tool.name();
        let code = require_str(invocation.args, "code", &tool_name)?;
        let language = optional_str(invocation.args, "language").unwrap_or(DEFAULT_LANGUAGE);

        let outcome = self
            .runner
            .run(language, code)
            .await
            .map_err(|error| error.classify(&tool_name))?;
        debug!(
            tool = %tool_name,
            language,
            exit_code = outcome.exit_code,
            "code run finished"
        );

        // Exit code and stderr go back to the model either way; a failing
        // run is useful feedback, not an execution error.
        let mut output = String::new();
        if outcome.exit_code != 0 {
            output.push_str(&format!("[exit code {}]\n", outcome.exit_code));
        }
        output.push_str(&outcome.stdout);
        if !outcome.stderr.is_empty() {
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output.push_str("[stderr]\n");
            output.push_str(&outcome.stderr);
        }

        if output.chars().count() > self.max_output_chars {
            let truncated: String = output.chars().take(self.max_output_chars).collect();
            return Ok(truncated + TRUNCATION_NOTE);
        }
        Ok(output)
    }
}
