//! Demo fixture data loaded at startup on request.
//!
//! Three accounts and two rostered projects, enough to exercise every
//! role gate from a fresh database. All demo accounts log in with the
//! password `password`.

use crate::api::AppState;
use crate::auth::{
    domain::User,
    services::{AccountServiceError, RegisterRequest},
};
use crate::project::services::{CreateProjectRequest, MemberSpec, ProjectCatalogError};
use thiserror::Error;

/// Password shared by all demo accounts.
const DEMO_PASSWORD: &str = "password";

/// Errors raised while loading the demo fixtures.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Registering a demo account failed.
    #[error("seeding accounts failed: {0}")]
    Accounts(#[from] AccountServiceError),
    /// Creating a demo project failed.
    #[error("seeding projects failed: {0}")]
    Projects(#[from] ProjectCatalogError),
}

/// Loads the demo fixture set through the service layer.
///
/// Safe to call once on an empty store; registering runs through the
/// same validation as the API, so the fixtures stay honest.
///
/// # Errors
///
/// Returns [`SeedError`] when registration or project creation fails,
/// including when the accounts already exist.
pub async fn load_demo_data(state: &AppState) -> Result<(), SeedError> {
    let juan = register(state, "Juan Perez", "juan@bottega.dev", "juan").await?;
    let maria = register(state, "Maria Garcia", "maria@bottega.dev", "maria").await?;
    let carlos = register(state, "Carlos Lopez", "carlos@bottega.dev", "carlos").await?;

    let migration = CreateProjectRequest::new("Database Migration")
        .with_description("Migrate the legacy database to PostgreSQL")
        .with_status("in_progress")
        .with_members([
            spec(&juan, "organizer"),
            spec(&maria, "executor"),
            spec(&carlos, "qa"),
        ]);
    state.catalog().create(migration).await?;

    let auth_system = CreateProjectRequest::new("Authentication System")
        .with_description("Implement OAuth 2.0 and multi-factor authentication")
        .with_status("open")
        .with_members([spec(&juan, "organizer"), spec(&maria, "executor")]);
    state.catalog().create(auth_system).await?;

    tracing::info!("demo fixtures loaded");
    Ok(())
}

async fn register(
    state: &AppState,
    full_name: &str,
    email: &str,
    avatar_seed: &str,
) -> Result<User, AccountServiceError> {
    let request = RegisterRequest::new(full_name, email, DEMO_PASSWORD).with_avatar_url(format!(
        "https://api.dicebear.com/7.x/avataaars/svg?seed={avatar_seed}"
    ));
    let user = state.accounts().register(request).await?;
    tracing::info!(user = %user.id(), name = full_name, "demo account created");
    Ok(user)
}

fn spec(user: &User, role: &str) -> MemberSpec {
    MemberSpec::new(user.id(), role)
}
