//! Port definitions for the attachment context.

mod repository;

pub use repository::{
    AttachmentRepository, AttachmentRepositoryError, AttachmentRepositoryResult,
};
