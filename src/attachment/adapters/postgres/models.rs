//! Row models mapping the attachments table to the domain.

use super::schema::attachments;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Queryable row for the `attachments` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attachments, check_for_backend(diesel::pg::Pg))]
pub struct AttachmentRow {
    /// Attachment UUID.
    pub id: Uuid,
    /// Context tag storage string.
    pub context: String,
    /// Parent UUID under the context.
    pub parent_id: Uuid,
    /// Resource type storage string.
    pub resource_type: String,
    /// Attachment URL.
    pub url: String,
    /// Original file name, if any.
    pub file_name: Option<String>,
    /// Uploading user UUID.
    pub uploaded_by: Uuid,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// Insertable row for the `attachments` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attachments)]
pub struct NewAttachmentRow {
    /// Attachment UUID.
    pub id: Uuid,
    /// Context tag storage string.
    pub context: String,
    /// Parent UUID under the context.
    pub parent_id: Uuid,
    /// Resource type storage string.
    pub resource_type: String,
    /// Attachment URL.
    pub url: String,
    /// Original file name, if any.
    pub file_name: Option<String>,
    /// Uploading user UUID.
    pub uploaded_by: Uuid,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}
