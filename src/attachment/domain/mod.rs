//! Domain model for the attachment context.

mod attachment;
mod error;
mod ids;

pub use attachment::{
    Attachment, AttachmentContext, AttachmentUrl, NewAttachmentData, PersistedAttachmentData,
    ResourceType,
};
pub use error::{
    AttachmentDomainError, ParseAttachmentContextError, ParseResourceTypeError,
};
pub use ids::AttachmentId;
