use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use tether_core::identifiers::{KnowledgeBaseId, OrgId};
use tether_engine::ports::{PortError, SearchHit, SearchScope, SearchService};

/// Search service fake returning a scripted hit list for any query, with
/// the last queried scope recorded for assertions.
#[derive(Debug, Default)]
pub struct ScriptedSearchService {
    hits: Vec<SearchHit>,
    documents: HashMap<(String, String), String>,
    domain_failure: Option<String>,
    last_scope: Mutex<Option<SearchScope>>,
}

impl ScriptedSearchService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hit(mut self, title: impl Into<String>, snippet: impl Into<String>) -> Self {
        self.hits.push(SearchHit {
            title: title.into(),
            snippet: snippet.into(),
            score: 1.0 - self.hits.len() as f64 * 0.1,
        });
        self
    }

    pub fn with_document(
        mut self,
        knowledge_base_id: impl Into<String>,
        document_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.documents
            .insert((knowledge_base_id.into(), document_id.into()), text.into());
        self
    }

    /// Make every semantic query fail with a domain refusal.
    pub fn with_domain_failure(mut self, message: impl Into<String>) -> Self {
        self.domain_failure = Some(message.into());
        self
    }

    /// The scope of the most recent semantic query.
    pub fn last_scope(&self) -> Option<SearchScope> {
        self.last_scope.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchService for ScriptedSearchService {
    async fn semantic_query(
        &self,
        _org: &OrgId,
        scope: &SearchScope,
        _query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, PortError> {
        *self.last_scope.lock().unwrap() = Some(scope.clone());
        if let Some(message) = &self.domain_failure {
            return Err(PortError::domain(message.clone()));
        }
        Ok(self.hits.iter().take(top_k).cloned().collect())
    }

    async fn document_text(
        &self,
        _org: &OrgId,
        knowledge_base_id: &KnowledgeBaseId,
        document_id: &str,
    ) -> Result<String, PortError> {
        self.documents
            .get(&(knowledge_base_id.to_string(), document_id.to_string()))
            .cloned()
            .ok_or_else(|| PortError::not_found(format!("document '{document_id}'")))
    }
}
