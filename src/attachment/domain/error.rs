//! Error types for the attachment domain.

use thiserror::Error;

/// Validation errors raised by attachment domain types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttachmentDomainError {
    /// Attachment URL was empty after trimming.
    #[error("attachment url must not be empty")]
    EmptyUrl,
    /// Attachment URL exceeded the storage limit.
    #[error("attachment url must be at most {maximum} characters")]
    UrlTooLong {
        /// Maximum accepted length in characters.
        maximum: usize,
    },
}

/// Error raised when parsing an unknown attachment context string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown attachment context: {0}")]
pub struct ParseAttachmentContextError(pub String);

/// Error raised when parsing an unknown resource type string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown resource type: {0}")]
pub struct ParseResourceTypeError(pub String);
