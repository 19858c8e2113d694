//! `PostgreSQL` repository implementation for project aggregates.

use super::{
    models::{NewProjectMemberRow, NewProjectRow, ProjectMemberRow, ProjectRow},
    schema::{project_members, projects},
};
use crate::auth::domain::UserId;
use crate::project::{
    domain::{
        PersistedProjectData, PersistedProjectMemberData, Project, ProjectId, ProjectMember,
        ProjectMemberId, ProjectName, ProjectRole, ProjectStatus,
    },
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by project adapters.
pub type ProjectPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: ProjectPgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ProjectPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }
}

impl From<diesel::result::Error> for ProjectRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let new_row = project_to_new_row(project);
        let member_rows = members_to_new_rows(project);

        self.run_blocking(move |connection| {
            let id_exists: i64 = projects::table
                .filter(projects::id.eq(project_id.into_inner()))
                .count()
                .get_result(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            if id_exists > 0 {
                return Err(ProjectRepositoryError::DuplicateProject(project_id));
            }

            connection.transaction::<_, ProjectRepositoryError, _>(|tx_conn| {
                diesel::insert_into(projects::table)
                    .values(&new_row)
                    .execute(tx_conn)?;
                diesel::insert_into(project_members::table)
                    .values(&member_rows)
                    .execute(tx_conn)?;
                Ok(())
            })
        })
        .await
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let new_row = project_to_new_row(project);
        let member_rows = members_to_new_rows(project);

        self.run_blocking(move |connection| {
            connection.transaction::<_, ProjectRepositoryError, _>(|tx_conn| {
                let affected = diesel::update(
                    projects::table.filter(projects::id.eq(project_id.into_inner())),
                )
                .set((
                    projects::name.eq(&new_row.name),
                    projects::description.eq(&new_row.description),
                    projects::status.eq(&new_row.status),
                ))
                .execute(tx_conn)?;
                if affected == 0 {
                    return Err(ProjectRepositoryError::ProjectNotFound(project_id));
                }

                diesel::delete(
                    project_members::table
                        .filter(project_members::project_id.eq(project_id.into_inner())),
                )
                .execute(tx_conn)?;
                diesel::insert_into(project_members::table)
                    .values(&member_rows)
                    .execute(tx_conn)?;
                Ok(())
            })
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected =
                diesel::delete(projects::table.filter(projects::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(ProjectRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ProjectRepositoryError::ProjectNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let Some(row) = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?
            else {
                return Ok(None);
            };

            let member_rows = load_member_rows(connection, &[row.id])?;
            rows_to_project(row, member_rows).map(Some)
        })
        .await
    }

    async fn list_for_member(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let project_ids: Vec<Uuid> = project_members::table
                .filter(project_members::user_id.eq(user_id.into_inner()))
                .select(project_members::project_id)
                .distinct()
                .load::<Uuid>(connection)
                .map_err(ProjectRepositoryError::persistence)?;

            let rows: Vec<ProjectRow> = projects::table
                .filter(projects::id.eq_any(&project_ids))
                .order((projects::created_at.desc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;

            let member_rows = load_member_rows(connection, &project_ids)?;
            rows.into_iter()
                .map(|row| {
                    let for_project: Vec<ProjectMemberRow> = member_rows
                        .iter()
                        .filter(|member| member.project_id == row.id)
                        .cloned()
                        .collect();
                    rows_to_project(row, for_project)
                })
                .collect()
        })
        .await
    }
}

fn load_member_rows(
    connection: &mut PgConnection,
    project_ids: &[Uuid],
) -> ProjectRepositoryResult<Vec<ProjectMemberRow>> {
    project_members::table
        .filter(project_members::project_id.eq_any(project_ids))
        .select(ProjectMemberRow::as_select())
        .load::<ProjectMemberRow>(connection)
        .map_err(ProjectRepositoryError::persistence)
}

fn project_to_new_row(project: &Project) -> NewProjectRow {
    NewProjectRow {
        id: project.id().into_inner(),
        name: project.name().as_str().to_owned(),
        description: project.description().map(ToOwned::to_owned),
        status: project.status().as_str().to_owned(),
        created_at: project.created_at(),
    }
}

fn members_to_new_rows(project: &Project) -> Vec<NewProjectMemberRow> {
    project
        .members()
        .iter()
        .map(|member| NewProjectMemberRow {
            id: member.id().into_inner(),
            project_id: member.project_id().into_inner(),
            user_id: member.user_id().into_inner(),
            role: member.role().as_str().to_owned(),
        })
        .collect()
}

fn rows_to_project(
    row: ProjectRow,
    member_rows: Vec<ProjectMemberRow>,
) -> ProjectRepositoryResult<Project> {
    let members = member_rows
        .into_iter()
        .map(row_to_member)
        .collect::<ProjectRepositoryResult<Vec<ProjectMember>>>()?;
    let data = PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        name: ProjectName::new(row.name).map_err(ProjectRepositoryError::persistence)?,
        description: row.description,
        status: ProjectStatus::try_from(row.status.as_str())
            .map_err(ProjectRepositoryError::persistence)?,
        members,
        created_at: row.created_at,
    };
    Ok(Project::from_persisted(data))
}

fn row_to_member(row: ProjectMemberRow) -> ProjectRepositoryResult<ProjectMember> {
    let data = PersistedProjectMemberData {
        id: ProjectMemberId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        user_id: UserId::from_uuid(row.user_id),
        role: ProjectRole::try_from(row.role.as_str())
            .map_err(ProjectRepositoryError::persistence)?,
    };
    Ok(ProjectMember::from_persisted(data))
}
