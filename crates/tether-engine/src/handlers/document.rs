//! Document create/update handlers.
//!
//! These tools are hybrids: the client renders their calls as widgets, and
//! the server persists the artifact. The handler side is a thin adapter
//! over the artifact store.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use tether_core::ToolError;
use tether_core::identifiers::ArtifactId;

use crate::ports::ArtifactStore;
use crate::registry::{HandlerFailure, Invocation, ToolHandler};

use super::require_str;

pub struct CreateDocumentHandler {
    artifacts: Arc<dyn ArtifactStore>,
}

impl CreateDocumentHandler {
    pub fn new(artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self { artifacts }
    }
}

#[async_trait]
impl ToolHandler for CreateDocumentHandler {
    async fn execute(&self, invocation: Invocation<'_>) -> Result<String, HandlerFailure> {
        let tool_name = invocation.tool.name();
        let title = require_str(invocation.args, "title", &tool_name)?;
        let content = require_str(invocation.args, "content", &tool_name)?;

        let artifact_id = self
            .artifacts
            .create(
                &invocation.context.org_id,
                &invocation.context.thread_id,
                title,
                content,
            )
            .await
            .map_err(|error| error.classify(&tool_name))?;

        info!(artifact = %artifact_id, "document created");
        Ok(format!("Created document '{title}' ({artifact_id})."))
    }
}

pub struct UpdateDocumentHandler {
    artifacts: Arc<dyn ArtifactStore>,
}

impl UpdateDocumentHandler {
    pub fn new(artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self { artifacts }
    }
}

#[async_trait]
impl ToolHandler for UpdateDocumentHandler {
    async fn execute(&self, invocation: Invocation<'_>) -> Result<String, HandlerFailure> {
        let tool_name = invocation.tool.name();
        let raw_id = require_str(invocation.args, "artifact_id", &tool_name)?;
        let content = require_str(invocation.args, "content", &tool_name)?;
        let artifact_id = ArtifactId::parse(raw_id).map_err(|error| {
            ToolError::exposed(tool_name.clone(), format!("invalid artifact id '{raw_id}': {error}"))
        })?;

        self.artifacts
            .update(&invocation.context.org_id, &artifact_id, content)
            .await
            .map_err(|error| error.classify(&tool_name))?;

        info!(artifact = %artifact_id, "document updated");
        Ok(format!("Updated document {artifact_id}."))
    }
}
