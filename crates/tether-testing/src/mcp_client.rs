use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use tether_core::identifiers::IntegrationId;
use tether_engine::ports::{McpClient, PortError};

/// MCP client fake with canned responses per remote tool name and per
/// resource URI, plus call recording.
#[derive(Debug, Default)]
pub struct StubMcpClient {
    tool_responses: HashMap<String, Value>,
    resources: HashMap<String, String>,
    unavailable: Option<String>,
    last_tool_call: Mutex<Option<(String, Value)>>,
    last_resource_read: Mutex<Option<(IntegrationId, String)>>,
}

impl StubMcpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool_response(mut self, remote_name: impl Into<String>, response: Value) -> Self {
        self.tool_responses.insert(remote_name.into(), response);
        self
    }

    pub fn with_resource(mut self, uri: impl Into<String>, content: impl Into<String>) -> Self {
        self.resources.insert(uri.into(), content.into());
        self
    }

    /// Make every call fail as if the integration were unreachable.
    pub fn with_unavailable(mut self, message: impl Into<String>) -> Self {
        self.unavailable = Some(message.into());
        self
    }

    /// The most recent `call_tool` invocation, for assertions.
    pub fn last_tool_call(&self) -> Option<(String, Value)> {
        self.last_tool_call.lock().unwrap().clone()
    }

    /// The `(integration, uri)` of the most recent `read_resource`.
    pub fn last_resource_read(&self) -> Option<(IntegrationId, String)> {
        self.last_resource_read.lock().unwrap().clone()
    }
}

#[async_trait]
impl McpClient for StubMcpClient {
    async fn call_tool(
        &self,
        _integration_id: &IntegrationId,
        remote_name: &str,
        arguments: Value,
    ) -> Result<Value, PortError> {
        *self.last_tool_call.lock().unwrap() = Some((remote_name.to_string(), arguments));
        if let Some(message) = &self.unavailable {
            return Err(PortError::unavailable(message.clone()));
        }
        self.tool_responses
            .get(remote_name)
            .cloned()
            .ok_or_else(|| PortError::not_found(format!("remote tool '{remote_name}'")))
    }

    async fn read_resource(
        &self,
        integration_id: &IntegrationId,
        uri: &str,
    ) -> Result<String, PortError> {
        *self.last_resource_read.lock().unwrap() =
            Some((integration_id.clone(), uri.to_string()));
        if let Some(message) = &self.unavailable {
            return Err(PortError::unavailable(message.clone()));
        }
        self.resources
            .get(uri)
            .cloned()
            .ok_or_else(|| PortError::not_found(format!("resource '{uri}'")))
    }
}
