//! Roster membership types for the project domain.

use super::{ParseProjectRoleError, ProjectId, ProjectMemberId};
use crate::auth::domain::UserId;
use serde::{Deserialize, Serialize};

/// Role a user holds inside a project roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    /// Owns the project, curates the roster, and assigns work.
    Organizer,
    /// Carries out tasks and submits deliveries.
    Executor,
    /// Reviews deliveries and issues verdicts.
    Qa,
}

impl ProjectRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organizer => "organizer",
            Self::Executor => "executor",
            Self::Qa => "qa",
        }
    }
}

impl TryFrom<&str> for ProjectRole {
    type Error = ParseProjectRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "organizer" => Ok(Self::Organizer),
            "executor" => Ok(Self::Executor),
            "qa" => Ok(Self::Qa),
            _ => Err(ParseProjectRoleError(value.to_owned())),
        }
    }
}

/// A single roster entry binding a user to a project under one role.
///
/// The same user may appear several times with different roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMember {
    id: ProjectMemberId,
    project_id: ProjectId,
    user_id: UserId,
    role: ProjectRole,
}

/// Parameter object for reconstructing a persisted roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectMemberData {
    /// Persisted roster entry identifier.
    pub id: ProjectMemberId,
    /// Owning project identifier.
    pub project_id: ProjectId,
    /// Member user identifier.
    pub user_id: UserId,
    /// Role held by the user.
    pub role: ProjectRole,
}

impl ProjectMember {
    /// Creates a new roster entry for a project.
    #[must_use]
    pub fn new(project_id: ProjectId, user_id: UserId, role: ProjectRole) -> Self {
        Self {
            id: ProjectMemberId::new(),
            project_id,
            user_id,
            role,
        }
    }

    /// Reconstructs a roster entry from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedProjectMemberData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            user_id: data.user_id,
            role: data.role,
        }
    }

    /// Returns the roster entry identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectMemberId {
        self.id
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the member user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the role held by the user.
    #[must_use]
    pub const fn role(&self) -> ProjectRole {
        self.role
    }
}
