//! Repository port for attachment records.

use crate::attachment::domain::{Attachment, AttachmentContext, AttachmentId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Result type for attachment repository operations.
pub type AttachmentRepositoryResult<T> = Result<T, AttachmentRepositoryError>;

/// Errors surfaced by attachment repository implementations.
#[derive(Debug, Error)]
pub enum AttachmentRepositoryError {
    /// An attachment with the same identifier already exists.
    #[error("attachment {0} already exists")]
    DuplicateAttachment(AttachmentId),
    /// No attachment exists with the given identifier.
    #[error("attachment {0} was not found")]
    AttachmentNotFound(AttachmentId),
    /// Underlying storage failed.
    #[error("persistence failure: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AttachmentRepositoryError {
    /// Wraps an arbitrary storage error as a persistence failure.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Persistence port for attachment records.
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    /// Stores a new attachment.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentRepositoryError::DuplicateAttachment`] when the
    /// identifier is already taken.
    async fn store(&self, attachment: &Attachment) -> AttachmentRepositoryResult<()>;

    /// Deletes an attachment.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentRepositoryError::AttachmentNotFound`] when no
    /// attachment carries the identifier.
    async fn delete(&self, id: AttachmentId) -> AttachmentRepositoryResult<()>;

    /// Retrieves an attachment.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentRepositoryError::Persistence`] when the lookup
    /// fails.
    async fn find_by_id(&self, id: AttachmentId)
    -> AttachmentRepositoryResult<Option<Attachment>>;

    /// Lists the attachments of the given parents under one context,
    /// oldest upload first.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentRepositoryError::Persistence`] when the listing
    /// fails.
    async fn list_for_parents(
        &self,
        context: AttachmentContext,
        parent_ids: &[Uuid],
    ) -> AttachmentRepositoryResult<Vec<Attachment>>;
}

#[async_trait]
impl<T: AttachmentRepository + ?Sized> AttachmentRepository for Arc<T> {
    async fn store(&self, attachment: &Attachment) -> AttachmentRepositoryResult<()> {
        (**self).store(attachment).await
    }

    async fn delete(&self, id: AttachmentId) -> AttachmentRepositoryResult<()> {
        (**self).delete(id).await
    }

    async fn find_by_id(
        &self,
        id: AttachmentId,
    ) -> AttachmentRepositoryResult<Option<Attachment>> {
        (**self).find_by_id(id).await
    }

    async fn list_for_parents(
        &self,
        context: AttachmentContext,
        parent_ids: &[Uuid],
    ) -> AttachmentRepositoryResult<Vec<Attachment>> {
        (**self).list_for_parents(context, parent_ids).await
    }
}
