//! QA review records and verdicts.

use super::{DeliveryId, ParseReviewVerdictError, ReviewId, WorkflowDomainError};
use crate::auth::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict a reviewer issues against a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewVerdict {
    /// The delivery is accepted; the task completes.
    Approve,
    /// The delivery needs rework; the task goes back to the executor.
    RequestChanges,
}

impl ReviewVerdict {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::RequestChanges => "request_changes",
        }
    }
}

impl TryFrom<&str> for ReviewVerdict {
    type Error = ParseReviewVerdictError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "approve" => Ok(Self::Approve),
            "request_changes" => Ok(Self::RequestChanges),
            _ => Err(ParseReviewVerdictError(value.to_owned())),
        }
    }
}

impl fmt::Display for ReviewVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verdict recorded against one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    id: ReviewId,
    delivery_id: DeliveryId,
    reviewer_id: UserId,
    verdict: ReviewVerdict,
    feedback: Option<String>,
    reviewed_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReviewData {
    /// Persisted review identifier.
    pub id: ReviewId,
    /// Reviewed delivery identifier.
    pub delivery_id: DeliveryId,
    /// Reviewer user identifier.
    pub reviewer_id: UserId,
    /// Persisted verdict.
    pub verdict: ReviewVerdict,
    /// Persisted feedback text, if any.
    pub feedback: Option<String>,
    /// Persisted review timestamp.
    pub reviewed_at: DateTime<Utc>,
}

impl Review {
    /// Creates a review for a delivery.
    ///
    /// Feedback is trimmed and a blank value collapses to none. A
    /// change-request verdict must carry feedback so the executor knows
    /// what to fix.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::FeedbackRequired`] when the verdict
    /// is [`ReviewVerdict::RequestChanges`] and no feedback was given.
    pub fn new(
        delivery_id: DeliveryId,
        reviewer_id: UserId,
        verdict: ReviewVerdict,
        feedback: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, WorkflowDomainError> {
        let cleaned_feedback = feedback.and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        });
        if verdict == ReviewVerdict::RequestChanges && cleaned_feedback.is_none() {
            return Err(WorkflowDomainError::FeedbackRequired);
        }
        Ok(Self {
            id: ReviewId::new(),
            delivery_id,
            reviewer_id,
            verdict,
            feedback: cleaned_feedback,
            reviewed_at: clock.utc(),
        })
    }

    /// Reconstructs a review from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReviewData) -> Self {
        Self {
            id: data.id,
            delivery_id: data.delivery_id,
            reviewer_id: data.reviewer_id,
            verdict: data.verdict,
            feedback: data.feedback,
            reviewed_at: data.reviewed_at,
        }
    }

    /// Returns the review identifier.
    #[must_use]
    pub const fn id(&self) -> ReviewId {
        self.id
    }

    /// Returns the reviewed delivery identifier.
    #[must_use]
    pub const fn delivery_id(&self) -> DeliveryId {
        self.delivery_id
    }

    /// Returns the reviewer user identifier.
    #[must_use]
    pub const fn reviewer_id(&self) -> UserId {
        self.reviewer_id
    }

    /// Returns the verdict.
    #[must_use]
    pub const fn verdict(&self) -> ReviewVerdict {
        self.verdict
    }

    /// Returns the feedback text, if any.
    #[must_use]
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// Returns the review timestamp.
    #[must_use]
    pub const fn reviewed_at(&self) -> DateTime<Utc> {
        self.reviewed_at
    }
}
