use async_trait::async_trait;
use std::collections::HashMap;

use tether_core::identifiers::{OrgId, SourceId};
use tether_engine::ports::{PortError, Source, SourceStore};

/// Source store fake: a fixed id-to-document map.
#[derive(Debug, Default)]
pub struct InMemorySourceStore {
    sources: HashMap<SourceId, Source>,
}

impl InMemorySourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(
        mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let id = SourceId::new_unchecked(id);
        self.sources.insert(
            id.clone(),
            Source {
                id,
                title: title.into(),
                text: text.into(),
            },
        );
        self
    }
}

#[async_trait]
impl SourceStore for InMemorySourceStore {
    async fn fetch(&self, _org: &OrgId, source_id: &SourceId) -> Result<Source, PortError> {
        self.sources
            .get(source_id)
            .cloned()
            .ok_or_else(|| PortError::not_found(format!("source '{source_id}'")))
    }
}
