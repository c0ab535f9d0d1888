use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

use tether_core::identifiers::{ArtifactId, OrgId, ThreadId};
use tether_engine::ports::{ArtifactStore, PortError};

/// Artifact store fake that records every create and update.
#[derive(Debug, Default)]
pub struct RecordingArtifactStore {
    known: Mutex<HashSet<ArtifactId>>,
    created: Mutex<Vec<(String, String)>>,
    updated: Mutex<Vec<(ArtifactId, String)>>,
}

impl RecordingArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an artifact that updates may target.
    pub fn with_artifact(self, artifact_id: impl Into<String>) -> Self {
        self.known
            .lock()
            .unwrap()
            .insert(ArtifactId::new_unchecked(artifact_id));
        self
    }

    /// Every `(title, content)` pair passed to `create`, in order.
    pub fn created(&self) -> Vec<(String, String)> {
        self.created.lock().unwrap().clone()
    }

    /// Every `(artifact_id, content)` pair passed to `update`, in order.
    pub fn updated(&self) -> Vec<(ArtifactId, String)> {
        self.updated.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactStore for RecordingArtifactStore {
    async fn create(
        &self,
        _org: &OrgId,
        _thread_id: &ThreadId,
        title: &str,
        content: &str,
    ) -> Result<ArtifactId, PortError> {
        let artifact_id = ArtifactId::new_unchecked(format!("art-{}", Uuid::new_v4()));
        self.known.lock().unwrap().insert(artifact_id.clone());
        self.created
            .lock()
            .unwrap()
            .push((title.to_string(), content.to_string()));
        Ok(artifact_id)
    }

    async fn update(
        &self,
        _org: &OrgId,
        artifact_id: &ArtifactId,
        content: &str,
    ) -> Result<(), PortError> {
        if !self.known.lock().unwrap().contains(artifact_id) {
            return Err(PortError::not_found(format!("artifact '{artifact_id}'")));
        }
        self.updated
            .lock()
            .unwrap()
            .push((artifact_id.clone(), content.to_string()));
        Ok(())
    }
}
