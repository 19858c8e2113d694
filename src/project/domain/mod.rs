//! Domain model for the project context.

mod error;
mod ids;
mod member;
mod project;

pub use error::{ParseProjectRoleError, ParseProjectStatusError, ProjectDomainError};
pub use ids::{ProjectId, ProjectMemberId};
pub use member::{PersistedProjectMemberData, ProjectMember, ProjectRole};
pub use project::{PersistedProjectData, Project, ProjectName, ProjectStatus};
