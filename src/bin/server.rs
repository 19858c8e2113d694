//! Bottega HTTP server.
//!
//! Wires the repository set picked by the environment into the service
//! layer, seeds demo data when asked, and serves the API until ctrl-c.

use bottega::api::{self, AppState};
use bottega::attachment::adapters::{
    memory::InMemoryAttachmentRepository, postgres::PostgresAttachmentRepository,
};
use bottega::auth::adapters::{memory::InMemoryAuthRepository, postgres::PostgresAuthRepository};
use bottega::config::ServerConfig;
use bottega::project::adapters::{
    memory::InMemoryProjectRepository, postgres::PostgresProjectRepository,
};
use bottega::seed;
use bottega::workflow::adapters::{
    memory::InMemoryWorkflowRepository, postgres::PostgresWorkflowRepository,
};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env()?;
    let state = config
        .database_url()
        .map_or_else(|| Ok(memory_state()), postgres_state)?;

    if config.seed_demo() {
        seed::load_demo_data(&state).await?;
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "listening");
    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Builds the application state over the in-memory adapters.
fn memory_state() -> AppState {
    tracing::info!("using in-memory persistence");
    AppState::new(
        Arc::new(InMemoryAuthRepository::new()),
        Arc::new(InMemoryProjectRepository::new()),
        Arc::new(InMemoryWorkflowRepository::new()),
        Arc::new(InMemoryAttachmentRepository::new()),
    )
}

/// Builds the application state over a shared PostgreSQL pool.
fn postgres_state(url: &str) -> Result<AppState, Box<dyn std::error::Error>> {
    tracing::info!("using PostgreSQL persistence");
    let pool: Pool<ConnectionManager<PgConnection>> =
        Pool::builder().build(ConnectionManager::new(url))?;
    Ok(AppState::new(
        Arc::new(PostgresAuthRepository::new(pool.clone())),
        Arc::new(PostgresProjectRepository::new(pool.clone())),
        Arc::new(PostgresWorkflowRepository::new(pool.clone())),
        Arc::new(PostgresAttachmentRepository::new(pool)),
    ))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
