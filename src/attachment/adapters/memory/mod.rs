//! In-memory adapters for the attachment context.

mod repository;

pub use repository::InMemoryAttachmentRepository;
