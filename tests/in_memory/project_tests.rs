//! Project catalogue CRUD and roster handling over in-memory adapters.

use super::helpers::{register_user, state, workshop};
use bottega::api::AppState;
use bottega::auth::domain::UserId;
use bottega::project::domain::{ProjectRole, ProjectStatus};
use bottega::project::services::{
    CreateProjectRequest, MemberSpec, ProjectCatalogError, UpdateProjectRequest,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rosters_skip_unknown_users(state: AppState) -> Result<(), eyre::Report> {
    let organizer = register_user(&state, "Ada Organizer", "ada@example.com").await?;

    let project = state
        .catalog()
        .create(CreateProjectRequest::new("Ghost roster").with_members([
            MemberSpec::new(organizer.id(), "organizer"),
            MemberSpec::new(UserId::new(), "executor"),
        ]))
        .await?;

    assert_eq!(project.members().len(), 1);
    assert!(project.has_role(organizer.id(), ProjectRole::Organizer));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_the_roster_wholesale(state: AppState) -> Result<(), eyre::Report> {
    let shop = workshop(&state).await?;

    let updated = state
        .catalog()
        .update(
            shop.project_id,
            UpdateProjectRequest::new()
                .with_status("done")
                .with_members([MemberSpec::new(shop.organizer.id(), "organizer")]),
        )
        .await?;

    assert_eq!(updated.status(), ProjectStatus::Done);
    assert_eq!(updated.members().len(), 1);
    assert!(!updated.is_member(shop.executor.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn projects_are_hidden_from_non_members(state: AppState) -> Result<(), eyre::Report> {
    let shop = workshop(&state).await?;
    let outsider = register_user(&state, "Olly Outsider", "olly@example.com").await?;

    let result = state.catalog().get(shop.project_id, outsider.id()).await;
    assert!(matches!(
        result,
        Err(ProjectCatalogError::ProjectNotFound(id)) if id == shop.project_id
    ));

    let listing = state.catalog().list_for_user(outsider.id()).await?;
    assert!(listing.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_cascades_to_tasks(state: AppState) -> Result<(), eyre::Report> {
    let shop = workshop(&state).await?;
    let task = shop.task_in_progress(&state).await?;

    state.catalog().delete(shop.project_id).await?;

    let lookup = state
        .lifecycle()
        .get_task(task.id(), shop.organizer.id())
        .await;
    assert!(lookup.is_err());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_role_strings_are_rejected(state: AppState) -> Result<(), eyre::Report> {
    let organizer = register_user(&state, "Ada Organizer", "ada@example.com").await?;

    let result = state
        .catalog()
        .create(
            CreateProjectRequest::new("Bad roles")
                .with_members([MemberSpec::new(organizer.id(), "overlord")]),
        )
        .await;
    assert!(matches!(result, Err(ProjectCatalogError::InvalidRole(_))));
    Ok(())
}
