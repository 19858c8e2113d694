//! PostgreSQL integration tests for the auth repository.

use super::helpers::{BoxError, checkout};
use bottega::auth::{
    adapters::postgres::PostgresAuthRepository,
    domain::{AccessToken, EmailAddress, PasswordHash, User},
    ports::{AuthRepository, AuthRepositoryError},
};
use chrono::Duration;
use mockable::{Clock, DefaultClock};

fn sample_user(email: &str) -> Result<User, BoxError> {
    let user = User::new(
        "Ada Organizer",
        EmailAddress::new(email)?,
        PasswordHash::derive("correct horse battery")?,
        None,
        &DefaultClock,
    )?;
    Ok(user)
}

#[tokio::test(flavor = "multi_thread")]
async fn users_round_trip_with_email_lookup() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let repo = PostgresAuthRepository::new(db.pool());

    let user = sample_user("ada@example.com")?;
    repo.store_user(&user).await?;

    let by_id = repo.find_user(user.id()).await?;
    assert_eq!(by_id.as_ref().map(User::id), Some(user.id()));

    let by_email = repo
        .find_user_by_email(&EmailAddress::new("ADA@example.com")?)
        .await?;
    assert_eq!(by_email.map(|found| found.id()), Some(user.id()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_emails_are_refused() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let repo = PostgresAuthRepository::new(db.pool());

    repo.store_user(&sample_user("ada@example.com")?).await?;
    let result = repo.store_user(&sample_user("ada@example.com")?).await;
    assert!(matches!(
        result,
        Err(AuthRepositoryError::DuplicateEmail(_))
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn tokens_store_resolve_and_purge() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let repo = PostgresAuthRepository::new(db.pool());

    let user = sample_user("ada@example.com")?;
    repo.store_user(&user).await?;
    let token = AccessToken::mint(user.id(), &DefaultClock);
    repo.store_token(&token).await?;

    let found = repo.find_token(token.digest()).await?;
    assert_eq!(found.map(|t| t.user_id()), Some(user.id()));

    // Nothing has expired yet, so the purge removes nothing.
    let now = DefaultClock.utc();
    assert_eq!(repo.purge_expired_tokens(user.id(), now).await?, 0);

    // Far in the future everything is stale.
    let later = now + Duration::days(365);
    assert_eq!(repo.purge_expired_tokens(user.id(), later).await?, 1);
    assert!(repo.find_token(token.digest()).await?.is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_an_unknown_token_is_a_no_op() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let repo = PostgresAuthRepository::new(db.pool());

    let user = sample_user("ada@example.com")?;
    repo.store_user(&user).await?;
    let token = AccessToken::mint(user.id(), &DefaultClock);
    repo.delete_token(token.digest()).await?;
    Ok(())
}
