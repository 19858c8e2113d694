//! Row models mapping project tables to the domain.

use super::schema::{project_members, projects};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Queryable row for the `projects` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects, check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project UUID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status storage string.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insertable row for the `projects` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow {
    /// Project UUID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status storage string.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Queryable row for the `project_members` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = project_members, check_for_backend(diesel::pg::Pg))]
pub struct ProjectMemberRow {
    /// Roster entry UUID.
    pub id: Uuid,
    /// Owning project UUID.
    pub project_id: Uuid,
    /// Member user UUID.
    pub user_id: Uuid,
    /// Role storage string.
    pub role: String,
}

/// Insertable row for the `project_members` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = project_members)]
pub struct NewProjectMemberRow {
    /// Roster entry UUID.
    pub id: Uuid,
    /// Owning project UUID.
    pub project_id: Uuid,
    /// Member user UUID.
    pub user_id: Uuid,
    /// Role storage string.
    pub role: String,
}
