//! In-memory repository for attachment records.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::attachment::{
    domain::{Attachment, AttachmentContext, AttachmentId},
    ports::{AttachmentRepository, AttachmentRepositoryError, AttachmentRepositoryResult},
};

/// Thread-safe in-memory attachment repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAttachmentRepository {
    state: Arc<RwLock<HashMap<AttachmentId, Attachment>>>,
}

impl InMemoryAttachmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Maps a poisoned lock into the persistence error variant.
fn poisoned(err: impl std::fmt::Display) -> AttachmentRepositoryError {
    AttachmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AttachmentRepository for InMemoryAttachmentRepository {
    async fn store(&self, attachment: &Attachment) -> AttachmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.contains_key(&attachment.id()) {
            return Err(AttachmentRepositoryError::DuplicateAttachment(
                attachment.id(),
            ));
        }
        state.insert(attachment.id(), attachment.clone());
        Ok(())
    }

    async fn delete(&self, id: AttachmentId) -> AttachmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.remove(&id).is_none() {
            return Err(AttachmentRepositoryError::AttachmentNotFound(id));
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: AttachmentId,
    ) -> AttachmentRepositoryResult<Option<Attachment>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_for_parents(
        &self,
        context: AttachmentContext,
        parent_ids: &[Uuid],
    ) -> AttachmentRepositoryResult<Vec<Attachment>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut attachments: Vec<Attachment> = state
            .values()
            .filter(|attachment| {
                attachment.context() == context && parent_ids.contains(&attachment.parent_id())
            })
            .cloned()
            .collect();
        attachments.sort_by(|a, b| {
            a.uploaded_at()
                .cmp(&b.uploaded_at())
                .then_with(|| a.id().into_inner().cmp(&b.id().into_inner()))
        });
        Ok(attachments)
    }
}
