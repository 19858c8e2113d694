//! Route table wiring handlers to paths.

use super::{handlers, state::AppState};
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the full API router over the given state.
///
/// Login, register, and the health probe are open; every other route
/// resolves the bearer token before running.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api/register", post(handlers::accounts::register))
        .route("/api/login", post(handlers::accounts::login))
        .route("/api/logout", post(handlers::accounts::logout))
        .route("/api/me", get(handlers::accounts::me))
        .route("/api/users", get(handlers::accounts::list_users))
        .route("/api/users/{id}", get(handlers::accounts::get_user))
        .route(
            "/api/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(handlers::projects::get_project)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route(
            "/api/projects/{id}/tasks",
            get(handlers::tasks::list_project_tasks),
        )
        .route("/api/tasks", post(handlers::tasks::create_task))
        .route(
            "/api/tasks/{id}",
            put(handlers::tasks::update_task).delete(handlers::tasks::delete_task),
        )
        .route("/api/tasks/{id}/status", patch(handlers::tasks::change_status))
        .route(
            "/api/tasks/{id}/deliveries",
            get(handlers::deliveries::list_deliveries),
        )
        .route("/api/deliveries", post(handlers::deliveries::submit_delivery))
        .route(
            "/api/deliveries/{id}/review",
            post(handlers::deliveries::review_delivery),
        )
        .route(
            "/api/tasks/{id}/attachments",
            get(handlers::attachments::list_task_attachments),
        )
        .route(
            "/api/attachments",
            post(handlers::attachments::add_attachment),
        )
        .route(
            "/api/attachments/{id}",
            delete(handlers::attachments::delete_attachment),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
