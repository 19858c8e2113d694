//! Registration, login, and token lifecycle over in-memory adapters.

use super::helpers::{register_user, state};
use bottega::api::AppState;
use bottega::auth::domain::TokenDigest;
use bottega::auth::services::AccountServiceError;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_login_and_authenticate_round_trip(state: AppState) -> Result<(), eyre::Report> {
    let user = register_user(&state, "Ada Organizer", "ada@example.com").await?;

    let session = state
        .accounts()
        .login("ada@example.com", "correct horse battery")
        .await?;
    assert_eq!(session.user().id(), user.id());

    let resolved = state.accounts().authenticate(session.token()).await?;
    assert_eq!(resolved.id(), user.id());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn wrong_password_is_rejected(state: AppState) -> Result<(), eyre::Report> {
    register_user(&state, "Ada Organizer", "ada@example.com").await?;

    let result = state.accounts().login("ada@example.com", "wrong").await;
    assert!(matches!(
        result,
        Err(AccountServiceError::InvalidCredentials)
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_email_is_rejected(state: AppState) -> Result<(), eyre::Report> {
    register_user(&state, "Ada Organizer", "ada@example.com").await?;

    let second = register_user(&state, "Impostor", "ada@example.com").await;
    assert!(second.is_err());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn logout_revokes_the_token(state: AppState) -> Result<(), eyre::Report> {
    register_user(&state, "Ada Organizer", "ada@example.com").await?;
    let session = state
        .accounts()
        .login("ada@example.com", "correct horse battery")
        .await?;

    state.accounts().logout(session.token()).await?;
    let result = state.accounts().authenticate(session.token()).await;
    assert!(matches!(result, Err(AccountServiceError::InvalidToken)));

    // Logout stays idempotent.
    state.accounts().logout(session.token()).await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_tokens_are_rejected(state: AppState) {
    let result = state.accounts().authenticate(&TokenDigest::generate()).await;
    assert!(matches!(result, Err(AccountServiceError::InvalidToken)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn directory_lists_users_by_name(state: AppState) -> Result<(), eyre::Report> {
    register_user(&state, "Zed Zealot", "zed@example.com").await?;
    register_user(&state, "Ada Organizer", "ada@example.com").await?;

    let users = state.accounts().users().await?;
    let names: Vec<&str> = users.iter().map(|user| user.full_name()).collect();
    assert_eq!(names, vec!["Ada Organizer", "Zed Zealot"]);
    Ok(())
}
