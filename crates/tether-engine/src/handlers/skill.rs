//! Skill activation: the one handler with side effects on the thread.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use tether_core::ToolError;
use tether_core::skill::{Skill, SkillName};

use crate::ports::{AttachError, SkillDirectory, SourceStore, ThreadStore};
use crate::registry::{HandlerFailure, Invocation, ToolHandler};

use super::require_str;

/// Activates a skill: resolves it by exact name, attaches its resources to
/// the calling thread, and returns the skill's instructions for injection
/// into the model's context.
///
/// The model may activate the same skill more than once in a conversation
/// (retries, parallel tool calls), so source attachment is idempotent:
/// an already-attached source is skipped, not an error. Integration
/// attachment has no such carve-out; a duplicate there propagates.
pub struct ActivateSkillHandler {
    skills: Arc<dyn SkillDirectory>,
    sources: Arc<dyn SourceStore>,
    threads: Arc<dyn ThreadStore>,
}

impl ActivateSkillHandler {
    pub fn new(
        skills: Arc<dyn SkillDirectory>,
        sources: Arc<dyn SourceStore>,
        threads: Arc<dyn ThreadStore>,
    ) -> Self {
        Self {
            skills,
            sources,
            threads,
        }
    }

    async fn resolve_skill(
        &self,
        invocation: &Invocation<'_>,
        name: &SkillName,
    ) -> Result<Skill, HandlerFailure> {
        let tool_name = invocation.tool.name();
        let org = &invocation.context.org_id;

        // Owned skills shadow shared ones of the same name.
        if let Some(skill) = self
            .skills
            .find_owned(org, name)
            .await
            .map_err(|error| error.classify(&tool_name))?
        {
            return Ok(skill);
        }
        if let Some(skill) = self
            .skills
            .find_shared(org, name)
            .await
            .map_err(|error| error.classify(&tool_name))?
        {
            return Ok(skill);
        }
        Err(ToolError::NotFound {
            tool: tool_name,
            resource: format!("skill '{name}'"),
        }
        .into())
    }
}

#[async_trait]
impl ToolHandler for ActivateSkillHandler {
    async fn execute(&self, invocation: Invocation<'_>) -> Result<String, HandlerFailure> {
        let tool_name = invocation.tool.name();
        let raw_name = require_str(invocation.args, "skill_name", &tool_name)?;
        let name = SkillName::parse(raw_name).map_err(|error| {
            ToolError::exposed(tool_name.clone(), format!("invalid skill name: {error}"))
        })?;

        let skill = self.resolve_skill(&invocation, &name).await?;
        let thread_id = &invocation.context.thread_id;

        // Validate the thread exists before mutating attachments.
        self.threads
            .fetch(&invocation.context.org_id, thread_id)
            .await
            .map_err(|error| error.classify(&tool_name))?;

        for source_id in &skill.source_ids {
            // A skill can outlive the sources it references; verify each
            // one still exists before mutating attachments.
            self.sources
                .fetch(&invocation.context.org_id, source_id)
                .await
                .map_err(|error| error.classify(&tool_name))?;

            match self.threads.attach_source(thread_id, source_id).await {
                Ok(()) => {
                    debug!(skill = %name, source = %source_id, "attached skill source");
                }
                Err(AttachError::AlreadyAttached) => {
                    debug!(skill = %name, source = %source_id, "source already attached, skipping");
                }
                Err(AttachError::Failed { message }) => {
                    return Err(ToolError::exposed(
                        tool_name,
                        format!("failed to attach source {source_id}: {message}"),
                    )
                    .into());
                }
            }
        }

        for integration_id in &skill.mcp_integration_ids {
            self.threads
                .attach_integration(thread_id, integration_id)
                .await
                .map_err(|error| {
                    ToolError::exposed(
                        tool_name.clone(),
                        format!("failed to attach integration {integration_id}: {error}"),
                    )
                })?;
        }

        info!(
            skill = %name,
            sources = skill.source_ids.len(),
            integrations = skill.mcp_integration_ids.len(),
            "skill activated"
        );
        Ok(skill.instructions)
    }
}
