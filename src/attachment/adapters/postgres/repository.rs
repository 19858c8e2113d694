//! `PostgreSQL` repository implementation for attachment records.

use super::{
    models::{AttachmentRow, NewAttachmentRow},
    schema::attachments,
};
use crate::attachment::{
    domain::{
        Attachment, AttachmentContext, AttachmentId, AttachmentUrl, PersistedAttachmentData,
        ResourceType,
    },
    ports::{AttachmentRepository, AttachmentRepositoryError, AttachmentRepositoryResult},
};
use crate::auth::domain::UserId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by attachment adapters.
pub type AttachmentPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed attachment repository.
#[derive(Debug, Clone)]
pub struct PostgresAttachmentRepository {
    pool: AttachmentPgPool,
}

impl PostgresAttachmentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AttachmentPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AttachmentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AttachmentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AttachmentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AttachmentRepositoryError::persistence)?
    }
}

#[async_trait]
impl AttachmentRepository for PostgresAttachmentRepository {
    async fn store(&self, attachment: &Attachment) -> AttachmentRepositoryResult<()> {
        let attachment_id = attachment.id();
        let new_row = attachment_to_new_row(attachment);

        self.run_blocking(move |connection| {
            diesel::insert_into(attachments::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        AttachmentRepositoryError::DuplicateAttachment(attachment_id)
                    }
                    _ => AttachmentRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: AttachmentId) -> AttachmentRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected =
                diesel::delete(attachments::table.filter(attachments::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(AttachmentRepositoryError::persistence)?;
            if affected == 0 {
                return Err(AttachmentRepositoryError::AttachmentNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: AttachmentId,
    ) -> AttachmentRepositoryResult<Option<Attachment>> {
        self.run_blocking(move |connection| {
            let row = attachments::table
                .filter(attachments::id.eq(id.into_inner()))
                .select(AttachmentRow::as_select())
                .first::<AttachmentRow>(connection)
                .optional()
                .map_err(AttachmentRepositoryError::persistence)?;
            row.map(row_to_attachment).transpose()
        })
        .await
    }

    async fn list_for_parents(
        &self,
        context: AttachmentContext,
        parent_ids: &[Uuid],
    ) -> AttachmentRepositoryResult<Vec<Attachment>> {
        let context_str = context.as_str().to_owned();
        let lookup = parent_ids.to_vec();
        self.run_blocking(move |connection| {
            let rows = attachments::table
                .filter(attachments::context.eq(context_str))
                .filter(attachments::parent_id.eq_any(&lookup))
                .order((attachments::uploaded_at.asc(), attachments::id.asc()))
                .select(AttachmentRow::as_select())
                .load::<AttachmentRow>(connection)
                .map_err(AttachmentRepositoryError::persistence)?;
            rows.into_iter().map(row_to_attachment).collect()
        })
        .await
    }
}

fn attachment_to_new_row(attachment: &Attachment) -> NewAttachmentRow {
    NewAttachmentRow {
        id: attachment.id().into_inner(),
        context: attachment.context().as_str().to_owned(),
        parent_id: attachment.parent_id(),
        resource_type: attachment.resource_type().as_str().to_owned(),
        url: attachment.url().as_str().to_owned(),
        file_name: attachment.file_name().map(ToOwned::to_owned),
        uploaded_by: attachment.uploaded_by().into_inner(),
        uploaded_at: attachment.uploaded_at(),
    }
}

fn row_to_attachment(row: AttachmentRow) -> AttachmentRepositoryResult<Attachment> {
    let data = PersistedAttachmentData {
        id: AttachmentId::from_uuid(row.id),
        context: AttachmentContext::try_from(row.context.as_str())
            .map_err(AttachmentRepositoryError::persistence)?,
        parent_id: row.parent_id,
        resource_type: ResourceType::try_from(row.resource_type.as_str())
            .map_err(AttachmentRepositoryError::persistence)?,
        url: AttachmentUrl::new(row.url).map_err(AttachmentRepositoryError::persistence)?,
        file_name: row.file_name,
        uploaded_by: UserId::from_uuid(row.uploaded_by),
        uploaded_at: row.uploaded_at,
    };
    Ok(Attachment::from_persisted(data))
}
