use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use tether_core::identifiers::{IntegrationId, OrgId, SourceId, ThreadId};
use tether_engine::ports::{AttachError, PortError, Thread, ThreadStore};

/// Thread store fake with real attachment semantics: attaching a resource
/// that is already present fails with [`AttachError::AlreadyAttached`],
/// exactly like the persistent store's unique constraint.
#[derive(Debug, Default)]
pub struct InMemoryThreadStore {
    threads: Mutex<HashMap<ThreadId, Thread>>,
}

impl InMemoryThreadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an empty thread.
    pub fn with_thread(self, thread_id: impl Into<String>) -> Self {
        let id = ThreadId::new_unchecked(thread_id);
        self.threads.lock().unwrap().insert(
            id.clone(),
            Thread {
                id: Some(id),
                ..Thread::default()
            },
        );
        self
    }

    /// Seed a thread with a source already attached.
    pub fn with_attached_source(
        self,
        thread_id: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        let id = ThreadId::new_unchecked(thread_id);
        let mut threads = self.threads.lock().unwrap();
        threads
            .entry(id.clone())
            .or_insert_with(|| Thread {
                id: Some(id),
                ..Thread::default()
            })
            .source_ids
            .push(SourceId::new_unchecked(source_id));
        drop(threads);
        self
    }

    /// Seed a thread with an integration already attached.
    pub fn with_attached_integration(
        self,
        thread_id: impl Into<String>,
        integration_id: impl Into<String>,
    ) -> Self {
        let id = ThreadId::new_unchecked(thread_id);
        let mut threads = self.threads.lock().unwrap();
        threads
            .entry(id.clone())
            .or_insert_with(|| Thread {
                id: Some(id),
                ..Thread::default()
            })
            .integration_ids
            .push(IntegrationId::new_unchecked(integration_id));
        drop(threads);
        self
    }

    /// Current state of a thread, for assertions.
    pub fn thread(&self, thread_id: &ThreadId) -> Option<Thread> {
        self.threads.lock().unwrap().get(thread_id).cloned()
    }
}

#[async_trait]
impl ThreadStore for InMemoryThreadStore {
    async fn fetch(&self, _org: &OrgId, thread_id: &ThreadId) -> Result<Thread, PortError> {
        self.threads
            .lock()
            .unwrap()
            .get(thread_id)
            .cloned()
            .ok_or_else(|| PortError::not_found(format!("thread '{thread_id}'")))
    }

    async fn attach_source(
        &self,
        thread_id: &ThreadId,
        source_id: &SourceId,
    ) -> Result<(), AttachError> {
        let mut threads = self.threads.lock().unwrap();
        let thread = threads.get_mut(thread_id).ok_or_else(|| AttachError::Failed {
            message: format!("thread '{thread_id}' does not exist"),
        })?;
        if thread.source_ids.contains(source_id) {
            return Err(AttachError::AlreadyAttached);
        }
        thread.source_ids.push(source_id.clone());
        Ok(())
    }

    async fn attach_integration(
        &self,
        thread_id: &ThreadId,
        integration_id: &IntegrationId,
    ) -> Result<(), AttachError> {
        let mut threads = self.threads.lock().unwrap();
        let thread = threads.get_mut(thread_id).ok_or_else(|| AttachError::Failed {
            message: format!("thread '{thread_id}' does not exist"),
        })?;
        if thread.integration_ids.contains(integration_id) {
            return Err(AttachError::AlreadyAttached);
        }
        thread.integration_ids.push(integration_id.clone());
        Ok(())
    }
}
