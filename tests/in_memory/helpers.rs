//! Shared helpers for in-memory integration tests.

use bottega::api::AppState;
use bottega::attachment::adapters::memory::InMemoryAttachmentRepository;
use bottega::auth::adapters::memory::InMemoryAuthRepository;
use bottega::auth::domain::User;
use bottega::auth::services::RegisterRequest;
use bottega::project::adapters::memory::InMemoryProjectRepository;
use bottega::project::domain::ProjectId;
use bottega::project::services::{CreateProjectRequest, MemberSpec};
use bottega::workflow::adapters::memory::InMemoryWorkflowRepository;
use bottega::workflow::domain::Task;
use bottega::workflow::services::CreateTaskRequest;
use rstest::fixture;
use std::sync::Arc;

/// Provides a fresh application state over in-memory adapters.
#[fixture]
pub fn state() -> AppState {
    AppState::new(
        Arc::new(InMemoryAuthRepository::new()),
        Arc::new(InMemoryProjectRepository::new()),
        Arc::new(InMemoryWorkflowRepository::new()),
        Arc::new(InMemoryAttachmentRepository::new()),
    )
}

/// Registers an account with a fixed password.
///
/// # Errors
///
/// Returns an error when registration fails.
pub async fn register_user(
    state: &AppState,
    full_name: &str,
    email: &str,
) -> Result<User, eyre::Report> {
    let user = state
        .accounts()
        .register(RegisterRequest::new(full_name, email, "correct horse battery"))
        .await?;
    Ok(user)
}

/// A project with one account per role, created through the services.
pub struct Workshop {
    /// The created project.
    pub project_id: ProjectId,
    /// Account holding the organizer role.
    pub organizer: User,
    /// Account holding the executor role.
    pub executor: User,
    /// Account holding the QA role.
    pub qa: User,
}

/// Registers three accounts and creates a rostered project.
///
/// # Errors
///
/// Returns an error when registration or project creation fails.
pub async fn workshop(state: &AppState) -> Result<Workshop, eyre::Report> {
    let organizer = register_user(state, "Ada Organizer", "ada@example.com").await?;
    let executor = register_user(state, "Eli Executor", "eli@example.com").await?;
    let qa = register_user(state, "Quinn Reviewer", "quinn@example.com").await?;

    let project = state
        .catalog()
        .create(
            CreateProjectRequest::new("Render farm overhaul")
                .with_description("Replace the render queue")
                .with_members([
                    MemberSpec::new(organizer.id(), "organizer"),
                    MemberSpec::new(executor.id(), "executor"),
                    MemberSpec::new(qa.id(), "qa"),
                ]),
        )
        .await?;

    Ok(Workshop {
        project_id: project.id(),
        organizer,
        executor,
        qa,
    })
}

impl Workshop {
    /// Creates a task assigned to the executor and walks it to
    /// `InProgress`.
    ///
    /// # Errors
    ///
    /// Returns an error when any lifecycle step fails.
    pub async fn task_in_progress(&self, state: &AppState) -> Result<Task, eyre::Report> {
        let created = state
            .lifecycle()
            .create_task(
                CreateTaskRequest::new(self.project_id, self.organizer.id(), "Shade pass")
                    .with_executor(self.executor.id())
                    .with_reviewer(self.qa.id()),
            )
            .await?;
        state
            .lifecycle()
            .change_status(created.id(), self.organizer.id(), "assigned")
            .await?;
        let started = state
            .lifecycle()
            .change_status(created.id(), self.executor.id(), "in_progress")
            .await?;
        Ok(started)
    }
}
