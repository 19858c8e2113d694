//! Error types for the workflow domain.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Validation errors raised by workflow domain types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowDomainError {
    /// Task title was empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,
    /// Task title exceeded the storage limit.
    #[error("task title must be at most {maximum} characters")]
    TitleTooLong {
        /// Maximum accepted length in characters.
        maximum: usize,
    },
    /// The requested status change does not follow a legal arrow.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidStateTransition {
        /// Task being transitioned.
        task_id: TaskId,
        /// Current lifecycle status.
        from: TaskStatus,
        /// Requested lifecycle status.
        to: TaskStatus,
    },
    /// Delivery summary was empty after trimming.
    #[error("delivery summary must not be empty")]
    EmptySummary,
    /// A change-request verdict arrived without feedback for the executor.
    #[error("feedback is required when requesting changes")]
    FeedbackRequired,
}

/// Error raised when parsing an unknown task status string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error raised when parsing an unknown task priority string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);

/// Error raised when parsing an unknown review verdict string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown review verdict: {0}")]
pub struct ParseReviewVerdictError(pub String);
