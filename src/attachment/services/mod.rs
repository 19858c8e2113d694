//! Service layer for the attachment library.

mod library;

pub use library::{
    AddAttachmentRequest, AttachmentLibraryError, AttachmentLibraryResult,
    AttachmentLibraryService, TaskAttachmentBundle,
};
