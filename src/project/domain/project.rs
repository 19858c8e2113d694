//! Project aggregate root and related catalogue types.

use super::{ParseProjectStatusError, ProjectDomainError, ProjectId, ProjectMember, ProjectRole};
use crate::auth::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) const MAX_PROJECT_NAME_LENGTH: usize = 255;

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Project accepts new work.
    Open,
    /// Project work is under way.
    InProgress,
    /// Project has been wrapped up.
    Done,
    /// Project was abandoned.
    Cancelled,
}

impl ProjectStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = ParseProjectStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseProjectStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated project display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Creates a validated project name.
    ///
    /// The value is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyName`] when the trimmed value is
    /// empty and [`ProjectDomainError::NameTooLong`] when it exceeds the
    /// storage limit.
    pub fn new(value: impl Into<String>) -> Result<Self, ProjectDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProjectDomainError::EmptyName);
        }
        if trimmed.chars().count() > MAX_PROJECT_NAME_LENGTH {
            return Err(ProjectDomainError::NameTooLong {
                maximum: MAX_PROJECT_NAME_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Project aggregate root.
///
/// Owns its roster: persistence reads and writes the member list together
/// with the project row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    id: ProjectId,
    name: ProjectName,
    description: Option<String>,
    status: ProjectStatus,
    members: Vec<ProjectMember>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted display name.
    pub name: ProjectName,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted lifecycle status.
    pub status: ProjectStatus,
    /// Persisted roster entries.
    pub members: Vec<ProjectMember>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project with an empty roster.
    #[must_use]
    pub fn new(
        name: ProjectName,
        description: Option<String>,
        status: ProjectStatus,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: ProjectId::new(),
            name,
            description,
            status,
            members: Vec::new(),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            status: data.status,
            members: data.members,
            created_at: data.created_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns the roster entries.
    #[must_use]
    pub fn members(&self) -> &[ProjectMember] {
        &self.members
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Renames the project.
    pub fn rename(&mut self, name: ProjectName) {
        self.name = name;
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Moves the project to a new lifecycle status.
    pub fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
    }

    /// Replaces the entire roster.
    pub fn replace_members(&mut self, members: Vec<ProjectMember>) {
        self.members = members;
    }

    /// Returns whether the user appears on the roster under any role.
    #[must_use]
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.members
            .iter()
            .any(|member| member.user_id() == user_id)
    }

    /// Returns whether the user holds the given role.
    #[must_use]
    pub fn has_role(&self, user_id: UserId, role: ProjectRole) -> bool {
        self.members
            .iter()
            .any(|member| member.user_id() == user_id && member.role() == role)
    }

    /// Returns every role the user holds, in roster order.
    #[must_use]
    pub fn roles_of(&self, user_id: UserId) -> Vec<ProjectRole> {
        self.members
            .iter()
            .filter(|member| member.user_id() == user_id)
            .map(ProjectMember::role)
            .collect()
    }
}
