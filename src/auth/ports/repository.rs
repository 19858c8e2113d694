//! Repository port for user and access token persistence.

use crate::auth::domain::{AccessToken, EmailAddress, TokenDigest, User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for auth repository operations.
pub type AuthRepositoryResult<T> = Result<T, AuthRepositoryError>;

/// User and access token persistence contract.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Stores a new user account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthRepositoryError::DuplicateUser`] when the user ID
    /// already exists or [`AuthRepositoryError::DuplicateEmail`] when the
    /// email address is already registered.
    async fn store_user(&self, user: &User) -> AuthRepositoryResult<()>;

    /// Finds a user by identifier.
    ///
    /// Returns `None` when the user does not exist.
    async fn find_user(&self, id: UserId) -> AuthRepositoryResult<Option<User>>;

    /// Finds a user by normalized email address.
    ///
    /// Returns `None` when no account uses the address.
    async fn find_user_by_email(&self, email: &EmailAddress)
    -> AuthRepositoryResult<Option<User>>;

    /// Returns all registered users ordered by display name.
    async fn list_users(&self) -> AuthRepositoryResult<Vec<User>>;

    /// Stores a freshly minted access token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthRepositoryError::DuplicateToken`] when the digest
    /// value collides with a stored token.
    async fn store_token(&self, token: &AccessToken) -> AuthRepositoryResult<()>;

    /// Finds an access token by its digest value.
    ///
    /// Returns `None` when no such token is stored. Expiry is not checked
    /// here; callers decide what an expired token means.
    async fn find_token(&self, digest: &TokenDigest) -> AuthRepositoryResult<Option<AccessToken>>;

    /// Deletes the token with the given digest.
    ///
    /// Deleting an unknown digest is a no-op, making logout idempotent.
    async fn delete_token(&self, digest: &TokenDigest) -> AuthRepositoryResult<()>;

    /// Deletes every token of `user_id` that expired at or before `now`.
    ///
    /// Returns the number of tokens removed.
    async fn purge_expired_tokens(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AuthRepositoryResult<u64>;
}

#[async_trait]
impl<T: AuthRepository + ?Sized> AuthRepository for Arc<T> {
    async fn store_user(&self, user: &User) -> AuthRepositoryResult<()> {
        (**self).store_user(user).await
    }

    async fn find_user(&self, id: UserId) -> AuthRepositoryResult<Option<User>> {
        (**self).find_user(id).await
    }

    async fn find_user_by_email(
        &self,
        email: &EmailAddress,
    ) -> AuthRepositoryResult<Option<User>> {
        (**self).find_user_by_email(email).await
    }

    async fn list_users(&self) -> AuthRepositoryResult<Vec<User>> {
        (**self).list_users().await
    }

    async fn store_token(&self, token: &AccessToken) -> AuthRepositoryResult<()> {
        (**self).store_token(token).await
    }

    async fn find_token(&self, digest: &TokenDigest) -> AuthRepositoryResult<Option<AccessToken>> {
        (**self).find_token(digest).await
    }

    async fn delete_token(&self, digest: &TokenDigest) -> AuthRepositoryResult<()> {
        (**self).delete_token(digest).await
    }

    async fn purge_expired_tokens(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AuthRepositoryResult<u64> {
        (**self).purge_expired_tokens(user_id, now).await
    }
}

/// Errors returned by auth repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AuthRepositoryError {
    /// A user with the same identifier already exists.
    #[error("duplicate user identifier: {0}")]
    DuplicateUser(UserId),

    /// The email address is already registered.
    #[error("email address already registered: {0}")]
    DuplicateEmail(EmailAddress),

    /// A token with the same digest already exists.
    ///
    /// The digest is not echoed back; token values are credentials.
    #[error("duplicate access token digest")]
    DuplicateToken,

    /// The user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuthRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
