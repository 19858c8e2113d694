//! `PostgreSQL` adapters for the attachment context.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::{AttachmentPgPool, PostgresAttachmentRepository};
