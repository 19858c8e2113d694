//! PostgreSQL integration tests for the project repository.

use super::helpers::{BoxError, TestDatabase, checkout};
use bottega::auth::{
    adapters::postgres::PostgresAuthRepository,
    domain::{EmailAddress, PasswordHash, User, UserId},
    ports::AuthRepository,
};
use bottega::project::{
    adapters::postgres::PostgresProjectRepository,
    domain::{Project, ProjectMember, ProjectName, ProjectRole, ProjectStatus},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use mockable::DefaultClock;

async fn stored_user(db: &TestDatabase, email: &str) -> Result<UserId, BoxError> {
    let repo = PostgresAuthRepository::new(db.pool());
    let user = User::new(
        "Roster Member",
        EmailAddress::new(email)?,
        PasswordHash::derive("correct horse battery")?,
        None,
        &DefaultClock,
    )?;
    repo.store_user(&user).await?;
    Ok(user.id())
}

fn rostered_project(user_id: UserId) -> Result<Project, BoxError> {
    let mut project = Project::new(
        ProjectName::new("Render farm overhaul")?,
        Some("Replace the render queue".to_owned()),
        ProjectStatus::Open,
        &DefaultClock,
    );
    project.replace_members(vec![ProjectMember::new(
        project.id(),
        user_id,
        ProjectRole::Organizer,
    )]);
    Ok(project)
}

#[tokio::test(flavor = "multi_thread")]
async fn projects_round_trip_with_their_roster() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let user_id = stored_user(&db, "ada@example.com").await?;
    let repo = PostgresProjectRepository::new(db.pool());

    let project = rostered_project(user_id)?;
    repo.store(&project).await?;

    let found = repo
        .find_by_id(project.id())
        .await?
        .ok_or("project should be stored")?;
    assert_eq!(found.members().len(), 1);
    assert!(found.has_role(user_id, ProjectRole::Organizer));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_the_roster() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let first = stored_user(&db, "ada@example.com").await?;
    let second = stored_user(&db, "eli@example.com").await?;
    let repo = PostgresProjectRepository::new(db.pool());

    let mut project = rostered_project(first)?;
    repo.store(&project).await?;

    project.set_status(ProjectStatus::InProgress);
    project.replace_members(vec![ProjectMember::new(
        project.id(),
        second,
        ProjectRole::Executor,
    )]);
    repo.update(&project).await?;

    let found = repo
        .find_by_id(project.id())
        .await?
        .ok_or("project should be stored")?;
    assert_eq!(found.status(), ProjectStatus::InProgress);
    assert!(!found.is_member(first));
    assert!(found.has_role(second, ProjectRole::Executor));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_is_scoped_to_roster_membership() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let member = stored_user(&db, "ada@example.com").await?;
    let outsider = stored_user(&db, "olly@example.com").await?;
    let repo = PostgresProjectRepository::new(db.pool());

    repo.store(&rostered_project(member)?).await?;

    assert_eq!(repo.list_for_member(member).await?.len(), 1);
    assert!(repo.list_for_member(outsider).await?.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_an_unknown_project_reports_not_found() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let user_id = stored_user(&db, "ada@example.com").await?;
    let repo = PostgresProjectRepository::new(db.pool());

    let unstored = rostered_project(user_id)?;
    let result = repo.delete(unstored.id()).await;
    assert!(matches!(
        result,
        Err(ProjectRepositoryError::ProjectNotFound(_))
    ));
    Ok(())
}
