//! Row models mapping workflow tables to the domain.

use super::schema::{qa_reviews, task_deliveries, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Queryable row for the `tasks` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks, check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task UUID.
    pub id: Uuid,
    /// Owning project UUID.
    pub project_id: Uuid,
    /// Requesting member UUID.
    pub requester_id: Uuid,
    /// Assigned executor UUID, if any.
    pub executor_id: Option<Uuid>,
    /// Assigned reviewer UUID, if any.
    pub reviewer_id: Option<Uuid>,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Urgency storage string.
    pub priority: String,
    /// Lifecycle status storage string.
    pub status: String,
    /// Due timestamp, if any.
    pub due_at: Option<DateTime<Utc>>,
    /// Completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insertable row for the `tasks` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task UUID.
    pub id: Uuid,
    /// Owning project UUID.
    pub project_id: Uuid,
    /// Requesting member UUID.
    pub requester_id: Uuid,
    /// Assigned executor UUID, if any.
    pub executor_id: Option<Uuid>,
    /// Assigned reviewer UUID, if any.
    pub reviewer_id: Option<Uuid>,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Urgency storage string.
    pub priority: String,
    /// Lifecycle status storage string.
    pub status: String,
    /// Due timestamp, if any.
    pub due_at: Option<DateTime<Utc>>,
    /// Completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Queryable row for the `task_deliveries` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_deliveries, check_for_backend(diesel::pg::Pg))]
pub struct DeliveryRow {
    /// Delivery UUID.
    pub id: Uuid,
    /// Owning task UUID.
    pub task_id: Uuid,
    /// Per-task version number.
    pub version: i32,
    /// Summary text.
    pub summary: String,
    /// Optional methodology notes.
    pub methodology: Option<String>,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
}

/// Insertable row for the `task_deliveries` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_deliveries)]
pub struct NewDeliveryRow {
    /// Delivery UUID.
    pub id: Uuid,
    /// Owning task UUID.
    pub task_id: Uuid,
    /// Per-task version number.
    pub version: i32,
    /// Summary text.
    pub summary: String,
    /// Optional methodology notes.
    pub methodology: Option<String>,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
}

/// Queryable row for the `qa_reviews` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = qa_reviews, check_for_backend(diesel::pg::Pg))]
pub struct ReviewRow {
    /// Review UUID.
    pub id: Uuid,
    /// Reviewed delivery UUID.
    pub delivery_id: Uuid,
    /// Reviewer user UUID.
    pub reviewer_id: Uuid,
    /// Verdict storage string.
    pub verdict: String,
    /// Optional feedback text.
    pub feedback: Option<String>,
    /// Review timestamp.
    pub reviewed_at: DateTime<Utc>,
}

/// Insertable row for the `qa_reviews` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = qa_reviews)]
pub struct NewReviewRow {
    /// Review UUID.
    pub id: Uuid,
    /// Reviewed delivery UUID.
    pub delivery_id: Uuid,
    /// Reviewer user UUID.
    pub reviewer_id: Uuid,
    /// Verdict storage string.
    pub verdict: String,
    /// Optional feedback text.
    pub feedback: Option<String>,
    /// Review timestamp.
    pub reviewed_at: DateTime<Utc>,
}
