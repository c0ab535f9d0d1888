//! Ambient identity and conversation state visible to tools.

use serde::{Deserialize, Serialize};

use crate::identifiers::{IntegrationId, KnowledgeBaseId, OrgId, SourceId, ThreadId};
use crate::skill::SkillName;

/// The only ambient identity a handler receives. Immutable per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolExecutionContext {
    pub org_id: OrgId,
    pub thread_id: ThreadId,
}

impl ToolExecutionContext {
    pub fn new(org_id: OrgId, thread_id: ThreadId) -> Self {
        Self { org_id, thread_id }
    }
}

/// Point-in-time view of a conversation's attached resources.
///
/// Contextual tools consult this to decide whether they should be surfaced
/// to the model at all: querying a source makes no sense on a thread with
/// no sources attached. The snapshot is assembled by the caller at the
/// start of a turn and is not kept in sync afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadSnapshot {
    /// Sources currently attached to the thread.
    pub source_ids: Vec<SourceId>,
    /// Knowledge bases the caller may search.
    pub knowledge_base_ids: Vec<KnowledgeBaseId>,
    /// MCP integrations attached to the thread.
    pub integration_ids: Vec<IntegrationId>,
    /// Skills the caller may activate this turn.
    pub offered_skills: Vec<SkillName>,
}

impl ThreadSnapshot {
    pub fn has_sources(&self) -> bool {
        !self.source_ids.is_empty()
    }

    pub fn has_knowledge_bases(&self) -> bool {
        !self.knowledge_base_ids.is_empty()
    }

    pub fn has_offered_skills(&self) -> bool {
        !self.offered_skills.is_empty()
    }
}
