//! Service layer for the project catalogue and roster management.

use crate::auth::{
    domain::UserId,
    ports::{AuthRepository, AuthRepositoryError},
};
use crate::project::{
    domain::{
        ParseProjectRoleError, ParseProjectStatusError, Project, ProjectDomainError, ProjectId,
        ProjectMember, ProjectName, ProjectRole, ProjectStatus,
    },
    ports::{ProjectRepository, ProjectRepositoryError},
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Requested roster entry: a user identifier paired with a role string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSpec {
    user_id: UserId,
    role: String,
}

impl MemberSpec {
    /// Creates a roster entry specification.
    #[must_use]
    pub fn new(user_id: UserId, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }
}

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: Option<String>,
    status: Option<String>,
    members: Vec<MemberSpec>,
}

impl CreateProjectRequest {
    /// Creates a request with the required project name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: None,
            members: Vec::new(),
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial lifecycle status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the initial roster.
    #[must_use]
    pub fn with_members(mut self, members: impl IntoIterator<Item = MemberSpec>) -> Self {
        self.members = members.into_iter().collect();
        self
    }
}

/// Request payload for a partial project update.
///
/// Absent fields leave the stored value untouched. A member list, when
/// present, replaces the existing roster wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProjectRequest {
    name: Option<String>,
    description: Option<String>,
    status: Option<String>,
    members: Option<Vec<MemberSpec>>,
}

impl UpdateProjectRequest {
    /// Creates an empty update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the project name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the description; an empty string clears it.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the lifecycle status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Replaces the roster.
    #[must_use]
    pub fn with_members(mut self, members: impl IntoIterator<Item = MemberSpec>) -> Self {
        self.members = Some(members.into_iter().collect());
        self
    }
}

/// Service-level errors for project catalogue operations.
#[derive(Debug, Error)]
pub enum ProjectCatalogError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// Project repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
    /// Account lookup failed.
    #[error(transparent)]
    Accounts(#[from] AuthRepositoryError),
    /// The status string did not parse.
    #[error(transparent)]
    InvalidStatus(#[from] ParseProjectStatusError),
    /// A roster role string did not parse.
    #[error(transparent)]
    InvalidRole(#[from] ParseProjectRoleError),
    /// The project does not exist, or the caller may not see it.
    #[error("project {0} was not found")]
    ProjectNotFound(ProjectId),
}

/// Result type for project catalogue operations.
pub type ProjectCatalogResult<T> = Result<T, ProjectCatalogError>;

/// Project catalogue orchestration service.
pub struct ProjectCatalogService<P, A, C>
where
    P: ProjectRepository,
    A: AuthRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    accounts: Arc<A>,
    clock: Arc<C>,
}

impl<P, A, C> Clone for ProjectCatalogService<P, A, C>
where
    P: ProjectRepository,
    A: AuthRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            projects: Arc::clone(&self.projects),
            accounts: Arc::clone(&self.accounts),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<P, A, C> ProjectCatalogService<P, A, C>
where
    P: ProjectRepository,
    A: AuthRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project catalogue service.
    #[must_use]
    pub const fn new(projects: Arc<P>, accounts: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            projects,
            accounts,
            clock,
        }
    }

    /// Creates a project together with its initial roster.
    ///
    /// Roster entries naming unknown users are skipped rather than
    /// rejected; duplicate `(user, role)` pairs collapse to one entry.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError`] when the name or status fails
    /// validation, a role string does not parse, or persistence fails.
    pub async fn create(&self, request: CreateProjectRequest) -> ProjectCatalogResult<Project> {
        let name = ProjectName::new(request.name)?;
        let status =
            parse_optional_status(request.status.as_deref())?.unwrap_or(ProjectStatus::Open);
        let description = normalize_description(request.description);

        let mut project = Project::new(name, description, status, &*self.clock);
        let members = self.resolve_members(project.id(), &request.members).await?;
        project.replace_members(members);

        self.projects.store(&project).await?;
        Ok(project)
    }

    /// Applies a partial update, replacing the roster when one is given.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::ProjectNotFound`] when the project
    /// does not exist, plus the same validation errors as [`Self::create`].
    pub async fn update(
        &self,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> ProjectCatalogResult<Project> {
        let mut project = self
            .projects
            .find_by_id(id)
            .await?
            .ok_or(ProjectCatalogError::ProjectNotFound(id))?;

        if let Some(name) = request.name {
            project.rename(ProjectName::new(name)?);
        }
        if let Some(description) = request.description {
            project.set_description(normalize_description(Some(description)));
        }
        if let Some(status) = request.status.as_deref() {
            project.set_status(ProjectStatus::try_from(status)?);
        }
        if let Some(specs) = request.members {
            let members = self.resolve_members(project.id(), &specs).await?;
            project.replace_members(members);
        }

        match self.projects.update(&project).await {
            Ok(()) => Ok(project),
            Err(ProjectRepositoryError::ProjectNotFound(_)) => {
                Err(ProjectCatalogError::ProjectNotFound(id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a project; tasks, deliveries, and reviews cascade away.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::ProjectNotFound`] when the project
    /// does not exist and [`ProjectCatalogError::Repository`] when
    /// persistence fails.
    pub async fn delete(&self, id: ProjectId) -> ProjectCatalogResult<()> {
        match self.projects.delete(id).await {
            Ok(()) => Ok(()),
            Err(ProjectRepositoryError::ProjectNotFound(_)) => {
                Err(ProjectCatalogError::ProjectNotFound(id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Retrieves a project the caller belongs to.
    ///
    /// A project the caller is not a member of is reported as not found,
    /// so existence is never leaked to outsiders.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::ProjectNotFound`] when the project
    /// does not exist or the caller is not on its roster.
    pub async fn get(&self, id: ProjectId, caller: UserId) -> ProjectCatalogResult<Project> {
        let project = self
            .projects
            .find_by_id(id)
            .await?
            .ok_or(ProjectCatalogError::ProjectNotFound(id))?;
        if !project.is_member(caller) {
            return Err(ProjectCatalogError::ProjectNotFound(id));
        }
        Ok(project)
    }

    /// Lists the caller's projects, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::Repository`] when the listing fails.
    pub async fn list_for_user(&self, caller: UserId) -> ProjectCatalogResult<Vec<Project>> {
        Ok(self.projects.list_for_member(caller).await?)
    }

    /// Resolves roster specifications into member entries, dropping
    /// unknown users and duplicate pairs.
    async fn resolve_members(
        &self,
        project_id: ProjectId,
        specs: &[MemberSpec],
    ) -> ProjectCatalogResult<Vec<ProjectMember>> {
        let mut members = Vec::with_capacity(specs.len());
        let mut seen: HashSet<(UserId, ProjectRole)> = HashSet::with_capacity(specs.len());
        for spec in specs {
            let role = ProjectRole::try_from(spec.role.as_str())?;
            if !seen.insert((spec.user_id, role)) {
                continue;
            }
            if self.accounts.find_user(spec.user_id).await?.is_none() {
                continue;
            }
            members.push(ProjectMember::new(project_id, spec.user_id, role));
        }
        Ok(members)
    }
}

fn parse_optional_status(
    status: Option<&str>,
) -> Result<Option<ProjectStatus>, ParseProjectStatusError> {
    status.map(ProjectStatus::try_from).transpose()
}

/// Collapses empty or blank descriptions to none.
fn normalize_description(description: Option<String>) -> Option<String> {
    description.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}
