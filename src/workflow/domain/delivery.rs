//! Delivery records handed in by executors.

use super::{DeliveryId, TaskId, WorkflowDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;

/// A delivery that has not yet been assigned its version number.
///
/// Version allocation happens in the repository, inside the same unit of
/// work that persists the delivery, so concurrent submissions cannot race
/// to the same number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryDraft {
    id: DeliveryId,
    task_id: TaskId,
    summary: String,
    methodology: Option<String>,
    submitted_at: DateTime<Utc>,
}

impl DeliveryDraft {
    /// Creates a draft delivery for a task.
    ///
    /// Summary and methodology are trimmed; a blank methodology collapses
    /// to none.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptySummary`] when the summary is
    /// blank.
    pub fn new(
        task_id: TaskId,
        summary: impl Into<String>,
        methodology: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, WorkflowDomainError> {
        let raw = summary.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WorkflowDomainError::EmptySummary);
        }
        let cleaned_methodology = methodology.and_then(|value| {
            let cleaned = value.trim();
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned.to_owned())
            }
        });
        Ok(Self {
            id: DeliveryId::new(),
            task_id,
            summary: trimmed.to_owned(),
            methodology: cleaned_methodology,
            submitted_at: clock.utc(),
        })
    }

    /// Returns the delivery identifier.
    #[must_use]
    pub const fn id(&self) -> DeliveryId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the summary text.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns the methodology notes, if any.
    #[must_use]
    pub fn methodology(&self) -> Option<&str> {
        self.methodology.as_deref()
    }

    /// Returns the submission timestamp.
    #[must_use]
    pub const fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Promotes the draft into a full delivery with its allocated version.
    #[must_use]
    pub fn into_delivery(self, version: u32) -> Delivery {
        Delivery {
            id: self.id,
            task_id: self.task_id,
            version,
            summary: self.summary,
            methodology: self.methodology,
            submitted_at: self.submitted_at,
        }
    }
}

/// A versioned delivery persisted against a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    id: DeliveryId,
    task_id: TaskId,
    version: u32,
    summary: String,
    methodology: Option<String>,
    submitted_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDeliveryData {
    /// Persisted delivery identifier.
    pub id: DeliveryId,
    /// Owning task identifier.
    pub task_id: TaskId,
    /// Allocated per-task version number.
    pub version: u32,
    /// Persisted summary text.
    pub summary: String,
    /// Persisted methodology notes, if any.
    pub methodology: Option<String>,
    /// Persisted submission timestamp.
    pub submitted_at: DateTime<Utc>,
}

impl Delivery {
    /// Reconstructs a delivery from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedDeliveryData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            version: data.version,
            summary: data.summary,
            methodology: data.methodology,
            submitted_at: data.submitted_at,
        }
    }

    /// Returns the delivery identifier.
    #[must_use]
    pub const fn id(&self) -> DeliveryId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the per-task version number.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the summary text.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns the methodology notes, if any.
    #[must_use]
    pub fn methodology(&self) -> Option<&str> {
        self.methodology.as_deref()
    }

    /// Returns the submission timestamp.
    #[must_use]
    pub const fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}
