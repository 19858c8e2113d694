//! PostgreSQL integration tests for the workflow repository.

use super::helpers::{BoxError, TestDatabase, checkout};
use bottega::auth::{
    adapters::postgres::PostgresAuthRepository,
    domain::{EmailAddress, PasswordHash, User, UserId},
    ports::AuthRepository,
};
use bottega::project::{
    adapters::postgres::PostgresProjectRepository,
    domain::{Project, ProjectId, ProjectMember, ProjectName, ProjectRole, ProjectStatus},
    ports::ProjectRepository,
};
use bottega::workflow::{
    adapters::postgres::PostgresWorkflowRepository,
    domain::{
        DeliveryDraft, NewTaskData, Review, ReviewVerdict, Task, TaskPriority, TaskStatus,
        TaskTitle,
    },
    ports::{WorkflowRepository, WorkflowRepositoryError},
};
use mockable::DefaultClock;

async fn seeded_project(db: &TestDatabase) -> Result<(ProjectId, UserId), BoxError> {
    let auth = PostgresAuthRepository::new(db.pool());
    let user = User::new(
        "Ada Organizer",
        EmailAddress::new("ada@example.com")?,
        PasswordHash::derive("correct horse battery")?,
        None,
        &DefaultClock,
    )?;
    auth.store_user(&user).await?;

    let projects = PostgresProjectRepository::new(db.pool());
    let mut project = Project::new(
        ProjectName::new("Render farm overhaul")?,
        None,
        ProjectStatus::Open,
        &DefaultClock,
    );
    project.replace_members(vec![ProjectMember::new(
        project.id(),
        user.id(),
        ProjectRole::Organizer,
    )]);
    projects.store(&project).await?;
    Ok((project.id(), user.id()))
}

fn sample_task(project_id: ProjectId, requester_id: UserId, title: &str) -> Result<Task, BoxError> {
    Ok(Task::new(
        NewTaskData {
            project_id,
            requester_id,
            executor_id: Some(requester_id),
            reviewer_id: Some(requester_id),
            title: TaskTitle::new(title)?,
            description: None,
            priority: TaskPriority::Medium,
            due_at: None,
        },
        &DefaultClock,
    ))
}

fn advance_to(task: &mut Task, target: TaskStatus) -> Result<(), BoxError> {
    let route = [
        TaskStatus::Assigned,
        TaskStatus::InProgress,
        TaskStatus::PendingQa,
        TaskStatus::InReview,
    ];
    for status in route {
        task.transition_to(status, &DefaultClock)?;
        if status == target {
            break;
        }
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn tasks_round_trip_and_list_per_project() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let (project_id, requester_id) = seeded_project(&db).await?;
    let repo = PostgresWorkflowRepository::new(db.pool());

    let first = sample_task(project_id, requester_id, "Wire up the render queue")?;
    let second = sample_task(project_id, requester_id, "Verify the output archive")?;
    repo.store_task(&first).await?;
    repo.store_task(&second).await?;

    let found = repo
        .find_task(first.id())
        .await?
        .ok_or("task should be stored")?;
    assert_eq!(found.title().as_str(), "Wire up the render queue");
    assert_eq!(found.status(), TaskStatus::Created);

    let listed = repo.list_tasks_for_project(project_id).await?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed.first().map(Task::id), Some(first.id()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deliveries_allocate_sequential_versions() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let (project_id, requester_id) = seeded_project(&db).await?;
    let repo = PostgresWorkflowRepository::new(db.pool());

    let mut task = sample_task(project_id, requester_id, "Wire up the render queue")?;
    repo.store_task(&task).await?;
    advance_to(&mut task, TaskStatus::PendingQa)?;

    let first_draft = DeliveryDraft::new(task.id(), "Queue wired", None, &DefaultClock)?;
    let first = repo.store_delivery(first_draft, &task).await?;
    assert_eq!(first.version(), 1);

    let second_draft = DeliveryDraft::new(task.id(), "Queue rewired", None, &DefaultClock)?;
    let second = repo.store_delivery(second_draft, &task).await?;
    assert_eq!(second.version(), 2);

    assert_eq!(repo.latest_delivery_version(task.id()).await?, Some(2));

    let listed = repo.list_deliveries(task.id()).await?;
    assert_eq!(
        listed.first().map(|delivery| delivery.version()),
        Some(2),
        "deliveries list newest version first"
    );

    let stored_task = repo
        .find_task(task.id())
        .await?
        .ok_or("task should be stored")?;
    assert_eq!(stored_task.status(), TaskStatus::PendingQa);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn each_delivery_carries_at_most_one_review() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let (project_id, requester_id) = seeded_project(&db).await?;
    let repo = PostgresWorkflowRepository::new(db.pool());

    let mut task = sample_task(project_id, requester_id, "Wire up the render queue")?;
    repo.store_task(&task).await?;
    advance_to(&mut task, TaskStatus::PendingQa)?;

    let draft = DeliveryDraft::new(task.id(), "Queue wired", None, &DefaultClock)?;
    let delivery = repo.store_delivery(draft, &task).await?;

    task.transition_to(TaskStatus::InReview, &DefaultClock)?;
    task.transition_to(TaskStatus::Completed, &DefaultClock)?;

    let review = Review::new(
        delivery.id(),
        requester_id,
        ReviewVerdict::Approve,
        None,
        &DefaultClock,
    )?;
    repo.store_review(&review, &task).await?;

    let found = repo
        .find_review_for_delivery(delivery.id())
        .await?
        .ok_or("review should be stored")?;
    assert_eq!(found.id(), review.id());

    let duplicate = Review::new(
        delivery.id(),
        requester_id,
        ReviewVerdict::RequestChanges,
        Some("Archive is missing".to_owned()),
        &DefaultClock,
    )?;
    let result = repo.store_review(&duplicate, &task).await;
    assert!(matches!(
        result,
        Err(WorkflowRepositoryError::DuplicateReview(_))
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_task_cascades_to_deliveries_and_reviews() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let (project_id, requester_id) = seeded_project(&db).await?;
    let repo = PostgresWorkflowRepository::new(db.pool());

    let mut task = sample_task(project_id, requester_id, "Wire up the render queue")?;
    repo.store_task(&task).await?;
    advance_to(&mut task, TaskStatus::InReview)?;

    let draft = DeliveryDraft::new(task.id(), "Queue wired", None, &DefaultClock)?;
    let delivery = repo.store_delivery(draft, &task).await?;
    let review = Review::new(
        delivery.id(),
        requester_id,
        ReviewVerdict::Approve,
        None,
        &DefaultClock,
    )?;
    repo.store_review(&review, &task).await?;

    repo.delete_task(task.id()).await?;

    assert!(repo.find_task(task.id()).await?.is_none());
    assert!(repo.find_delivery(delivery.id()).await?.is_none());
    assert!(repo.find_review(review.id()).await?.is_none());
    Ok(())
}
