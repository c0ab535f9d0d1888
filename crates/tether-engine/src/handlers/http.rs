//! Configured HTTP endpoint handler.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use tether_core::ToolError;
use tether_core::tool::Tool;

use crate::ports::{HttpGateway, HttpOutcall};
use crate::registry::{HandlerFailure, Invocation, ToolHandler};

const BODY_PREVIEW_CHARS: usize = 20_000;

/// Sends the user-configured outcall with the model's validated arguments.
/// One handler serves every configured endpoint; the per-endpoint config
/// rides on the tool instance.
pub struct HttpEndpointHandler {
    gateway: Arc<dyn HttpGateway>,
}

impl HttpEndpointHandler {
    pub fn new(gateway: Arc<dyn HttpGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ToolHandler for HttpEndpointHandler {
    async fn execute(&self, invocation: Invocation<'_>) -> Result<String, HandlerFailure> {
        let tool_name = invocation.tool.name();
        let Tool::HttpEndpoint { config, .. } = invocation.tool else {
            return Err(ToolError::internal(
                tool_name,
                "http endpoint handler bound to a non-endpoint tool",
            )
            .into());
        };

        let outcall = HttpOutcall {
            url: config.url.clone(),
            method: config.method,
            headers: config.headers.clone(),
            arguments: invocation.args.clone(),
        };
        debug!(tool = %tool_name, url = %config.url, method = config.method.as_str(), "sending endpoint outcall");

        let response = self
            .gateway
            .send(outcall)
            .await
            .map_err(|error| error.classify(&tool_name))?;

        let body: String = response.body.chars().take(BODY_PREVIEW_CHARS).collect();
        if response.status >= 400 {
            // The endpoint answered; its refusal is actionable for the model.
            return Err(ToolError::exposed(
                tool_name,
                format!("endpoint returned status {}: {body}", response.status),
            )
            .into());
        }
        Ok(format!("Status {}\n{body}", response.status))
    }
}
