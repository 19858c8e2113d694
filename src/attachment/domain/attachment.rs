//! Attachment records and their polymorphic parent tagging.

use super::{
    AttachmentDomainError, AttachmentId, ParseAttachmentContextError, ParseResourceTypeError,
};
use crate::auth::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub(crate) const MAX_URL_LENGTH: usize = 500;

/// Which kind of parent an attachment hangs off.
///
/// Together with the parent identifier this forms the polymorphic link:
/// `Request` points at a task, `Delivery` at a delivery, `Review` at a
/// review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentContext {
    /// Attached to the task itself, as part of the request.
    Request,
    /// Attached to a submitted delivery.
    Delivery,
    /// Attached to a QA review.
    Review,
}

impl AttachmentContext {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Delivery => "delivery",
            Self::Review => "review",
        }
    }
}

impl TryFrom<&str> for AttachmentContext {
    type Error = ParseAttachmentContextError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "request" => Ok(Self::Request),
            "delivery" => Ok(Self::Delivery),
            "review" => Ok(Self::Review),
            _ => Err(ParseAttachmentContextError(value.to_owned())),
        }
    }
}

impl fmt::Display for AttachmentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad classification of the attached resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Still image or frame grab.
    Image,
    /// Document of any format.
    Document,
    /// External link.
    Link,
    /// Anything else.
    #[default]
    Other,
}

impl ResourceType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Document => "document",
            Self::Link => "link",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for ResourceType {
    type Error = ParseResourceTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "image" => Ok(Self::Image),
            "document" => Ok(Self::Document),
            "link" => Ok(Self::Link),
            "other" => Ok(Self::Other),
            _ => Err(ParseResourceTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated attachment URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentUrl(String);

impl AttachmentUrl {
    /// Creates a validated attachment URL.
    ///
    /// The value is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentDomainError::EmptyUrl`] when the trimmed value
    /// is empty and [`AttachmentDomainError::UrlTooLong`] when it exceeds
    /// the storage limit.
    pub fn new(value: impl Into<String>) -> Result<Self, AttachmentDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AttachmentDomainError::EmptyUrl);
        }
        if trimmed.chars().count() > MAX_URL_LENGTH {
            return Err(AttachmentDomainError::UrlTooLong {
                maximum: MAX_URL_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AttachmentUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttachmentUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An attachment hanging off a task, delivery, or review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    id: AttachmentId,
    context: AttachmentContext,
    parent_id: Uuid,
    resource_type: ResourceType,
    url: AttachmentUrl,
    file_name: Option<String>,
    uploaded_by: UserId,
    uploaded_at: DateTime<Utc>,
}

/// Parameter object for creating a fresh attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachmentData {
    /// Which kind of parent the attachment hangs off.
    pub context: AttachmentContext,
    /// Parent identifier under the claimed context.
    pub parent_id: Uuid,
    /// Resource classification.
    pub resource_type: ResourceType,
    /// Validated URL.
    pub url: AttachmentUrl,
    /// Original file name, if any.
    pub file_name: Option<String>,
    /// Uploading user identifier.
    pub uploaded_by: UserId,
}

/// Parameter object for reconstructing a persisted attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAttachmentData {
    /// Persisted attachment identifier.
    pub id: AttachmentId,
    /// Persisted context tag.
    pub context: AttachmentContext,
    /// Persisted parent identifier.
    pub parent_id: Uuid,
    /// Persisted resource classification.
    pub resource_type: ResourceType,
    /// Persisted URL.
    pub url: AttachmentUrl,
    /// Persisted file name, if any.
    pub file_name: Option<String>,
    /// Uploading user identifier.
    pub uploaded_by: UserId,
    /// Persisted upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

impl Attachment {
    /// Creates a new attachment record.
    #[must_use]
    pub fn new(data: NewAttachmentData, clock: &impl Clock) -> Self {
        Self {
            id: AttachmentId::new(),
            context: data.context,
            parent_id: data.parent_id,
            resource_type: data.resource_type,
            url: data.url,
            file_name: data.file_name,
            uploaded_by: data.uploaded_by,
            uploaded_at: clock.utc(),
        }
    }

    /// Reconstructs an attachment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAttachmentData) -> Self {
        Self {
            id: data.id,
            context: data.context,
            parent_id: data.parent_id,
            resource_type: data.resource_type,
            url: data.url,
            file_name: data.file_name,
            uploaded_by: data.uploaded_by,
            uploaded_at: data.uploaded_at,
        }
    }

    /// Returns the attachment identifier.
    #[must_use]
    pub const fn id(&self) -> AttachmentId {
        self.id
    }

    /// Returns the context tag.
    #[must_use]
    pub const fn context(&self) -> AttachmentContext {
        self.context
    }

    /// Returns the parent identifier under the context.
    #[must_use]
    pub const fn parent_id(&self) -> Uuid {
        self.parent_id
    }

    /// Returns the resource classification.
    #[must_use]
    pub const fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Returns the URL.
    #[must_use]
    pub const fn url(&self) -> &AttachmentUrl {
        &self.url
    }

    /// Returns the original file name, if any.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Returns the uploading user identifier.
    #[must_use]
    pub const fn uploaded_by(&self) -> UserId {
        self.uploaded_by
    }

    /// Returns the upload timestamp.
    #[must_use]
    pub const fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }
}
