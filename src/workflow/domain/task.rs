//! Task aggregate root and the lifecycle state machine.

use super::{ParseTaskPriorityError, ParseTaskStatusError, TaskId, WorkflowDomainError};
use crate::auth::domain::UserId;
use crate::project::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) const MAX_TASK_TITLE_LENGTH: usize = 255;

/// Task lifecycle status.
///
/// The pipeline runs `Created → Assigned → InProgress → PendingQa →
/// InReview`, where review verdicts either complete the task or send it
/// back through `ChangesRequested → InProgress`. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task exists but nobody is assigned.
    Created,
    /// An executor has been assigned.
    Assigned,
    /// The executor is working on it.
    InProgress,
    /// A delivery is in and waits for QA pickup.
    PendingQa,
    /// QA is reviewing the delivery.
    InReview,
    /// QA sent the work back; the executor has feedback to act on.
    ChangesRequested,
    /// The delivery was approved.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::PendingQa => "pending_qa",
            Self::InReview => "in_review",
            Self::ChangesRequested => "changes_requested",
            Self::Completed => "completed",
        }
    }

    /// Returns whether moving to `target` follows a legal arrow.
    ///
    /// Staying in place is never legal.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Created, Self::Assigned)
                | (Self::Assigned, Self::InProgress)
                | (Self::InProgress, Self::PendingQa)
                | (Self::PendingQa, Self::InReview)
                | (Self::InReview, Self::ChangesRequested)
                | (Self::InReview, Self::Completed)
                | (Self::ChangesRequested, Self::InProgress)
        )
    }

    /// Returns whether the status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "created" => Ok(Self::Created),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "pending_qa" => Ok(Self::PendingQa),
            "in_review" => Ok(Self::InReview),
            "changes_requested" => Ok(Self::ChangesRequested),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task urgency level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal queue position.
    #[default]
    Medium,
    /// Should jump the queue.
    High,
    /// Drop everything.
    Critical,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated task title.
    ///
    /// The value is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyTitle`] when the trimmed value
    /// is empty and [`WorkflowDomainError::TitleTooLong`] when it exceeds
    /// the storage limit.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkflowDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WorkflowDomainError::EmptyTitle);
        }
        if trimmed.chars().count() > MAX_TASK_TITLE_LENGTH {
            return Err(WorkflowDomainError::TitleTooLong {
                maximum: MAX_TASK_TITLE_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    requester_id: UserId,
    executor_id: Option<UserId>,
    reviewer_id: Option<UserId>,
    title: TaskTitle,
    description: Option<String>,
    priority: TaskPriority,
    status: TaskStatus,
    due_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for creating a fresh task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Owning project identifier.
    pub project_id: ProjectId,
    /// Member who raised the task.
    pub requester_id: UserId,
    /// Executor assigned at creation, if any.
    pub executor_id: Option<UserId>,
    /// Reviewer assigned at creation, if any.
    pub reviewer_id: Option<UserId>,
    /// Validated title.
    pub title: TaskTitle,
    /// Free-form description, if any.
    pub description: Option<String>,
    /// Urgency level.
    pub priority: TaskPriority,
    /// Due timestamp, if any.
    pub due_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning project identifier.
    pub project_id: ProjectId,
    /// Member who raised the task.
    pub requester_id: UserId,
    /// Assigned executor, if any.
    pub executor_id: Option<UserId>,
    /// Assigned reviewer, if any.
    pub reviewer_id: Option<UserId>,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted urgency level.
    pub priority: TaskPriority,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted due timestamp, if any.
    pub due_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in the `Created` status.
    #[must_use]
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            project_id: data.project_id,
            requester_id: data.requester_id,
            executor_id: data.executor_id,
            reviewer_id: data.reviewer_id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: TaskStatus::Created,
            due_at: data.due_at,
            completed_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            requester_id: data.requester_id,
            executor_id: data.executor_id,
            reviewer_id: data.reviewer_id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            due_at: data.due_at,
            completed_at: data.completed_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the member who raised the task.
    #[must_use]
    pub const fn requester_id(&self) -> UserId {
        self.requester_id
    }

    /// Returns the assigned executor, if any.
    #[must_use]
    pub const fn executor_id(&self) -> Option<UserId> {
        self.executor_id
    }

    /// Returns the assigned reviewer, if any.
    #[must_use]
    pub const fn reviewer_id(&self) -> Option<UserId> {
        self.reviewer_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the urgency level.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the due timestamp, if any.
    #[must_use]
    pub const fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due_at
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the task along a legal lifecycle arrow.
    ///
    /// Entering `Completed` stamps the completion timestamp the first time.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidStateTransition`] when the
    /// arrow is not legal; the task is left untouched.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), WorkflowDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(WorkflowDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        if target == TaskStatus::Completed && self.completed_at.is_none() {
            self.completed_at = Some(clock.utc());
        }
        self.touch(clock);
        Ok(())
    }

    /// Replaces the title.
    pub fn rename(&mut self, title: TaskTitle, clock: &impl Clock) {
        self.title = title;
        self.touch(clock);
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: Option<String>, clock: &impl Clock) {
        self.description = description;
        self.touch(clock);
    }

    /// Replaces the urgency level.
    pub fn set_priority(&mut self, priority: TaskPriority, clock: &impl Clock) {
        self.priority = priority;
        self.touch(clock);
    }

    /// Replaces the due timestamp.
    pub fn set_due_at(&mut self, due_at: Option<DateTime<Utc>>, clock: &impl Clock) {
        self.due_at = due_at;
        self.touch(clock);
    }

    /// Sets assignees; `None` leaves the existing assignee untouched.
    pub fn assign(
        &mut self,
        executor_id: Option<UserId>,
        reviewer_id: Option<UserId>,
        clock: &impl Clock,
    ) {
        if let Some(executor) = executor_id {
            self.executor_id = Some(executor);
        }
        if let Some(reviewer) = reviewer_id {
            self.reviewer_id = Some(reviewer);
        }
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
