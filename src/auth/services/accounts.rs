//! Service layer for account registration and bearer-token sessions.

use crate::auth::{
    domain::{AccessToken, AuthDomainError, EmailAddress, PasswordHash, TokenDigest, User, UserId},
    ports::{AuthRepository, AuthRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a new account.
#[derive(Clone)]
pub struct RegisterRequest {
    full_name: String,
    email: String,
    password: String,
    avatar_url: Option<String>,
}

impl RegisterRequest {
    /// Creates a request with the required account fields.
    #[must_use]
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            password: password.into(),
            avatar_url: None,
        }
    }

    /// Sets the avatar URL shown next to the account.
    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("avatar_url", &self.avatar_url)
            .finish()
    }
}

/// An authenticated session minted by [`AccountService::login`].
#[derive(Debug, Clone)]
pub struct AuthSession {
    user: User,
    token: TokenDigest,
    expires_at: DateTime<Utc>,
}

impl AuthSession {
    /// Returns the authenticated user.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Returns the bearer token the client presents on later requests.
    #[must_use]
    pub const fn token(&self) -> &TokenDigest {
        &self.token
    }

    /// Returns when the session token stops being accepted.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum AccountServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AuthDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AuthRepositoryError),
    /// Login was attempted with an unknown email or a wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// A bearer token was missing, malformed, expired, or revoked.
    #[error("invalid or expired access token")]
    InvalidToken,
    /// No user exists with the requested identifier.
    #[error("user {0} was not found")]
    UserNotFound(UserId),
}

/// Result type for account service operations.
pub type AccountServiceResult<T> = Result<T, AccountServiceError>;

/// Account orchestration service covering registration and sessions.
pub struct AccountService<R, C>
where
    R: AuthRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for AccountService<R, C>
where
    R: AuthRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> AccountService<R, C>
where
    R: AuthRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new account service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a new account and stores it.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::Domain`] when the name, email, or
    /// password fails validation and [`AccountServiceError::Repository`]
    /// when the email is already taken or persistence fails.
    pub async fn register(&self, request: RegisterRequest) -> AccountServiceResult<User> {
        let email = EmailAddress::new(request.email)?;
        let password_hash = PasswordHash::derive(&request.password)?;
        let user = User::new(
            request.full_name,
            email,
            password_hash,
            request.avatar_url,
            &*self.clock,
        )?;
        self.repository.store_user(&user).await?;
        Ok(user)
    }

    /// Verifies credentials and mints a fresh access token.
    ///
    /// Expired tokens belonging to the account are purged as a side effect,
    /// so long-lived accounts do not accumulate dead rows.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::InvalidCredentials`] when the email is
    /// unknown or the password does not match, and
    /// [`AccountServiceError::Repository`] when persistence fails.
    pub async fn login(&self, email: &str, password: &str) -> AccountServiceResult<AuthSession> {
        let address =
            EmailAddress::new(email).map_err(|_| AccountServiceError::InvalidCredentials)?;
        let user = self
            .repository
            .find_user_by_email(&address)
            .await?
            .ok_or(AccountServiceError::InvalidCredentials)?;
        if !user.password_hash().verify(password) {
            return Err(AccountServiceError::InvalidCredentials);
        }

        let now = self.clock.utc();
        self.repository.purge_expired_tokens(user.id(), now).await?;

        let token = AccessToken::mint(user.id(), &*self.clock);
        self.repository.store_token(&token).await?;
        Ok(AuthSession {
            token: token.digest().clone(),
            expires_at: token.expires_at(),
            user,
        })
    }

    /// Revokes a session token.
    ///
    /// Revoking a token that no longer exists succeeds, so repeated logout
    /// requests stay idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::Repository`] when persistence fails.
    pub async fn logout(&self, token: &TokenDigest) -> AccountServiceResult<()> {
        self.repository.delete_token(token).await?;
        Ok(())
    }

    /// Resolves a bearer token to the account that owns it.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::InvalidToken`] when the token is
    /// unknown, expired, or orphaned, and
    /// [`AccountServiceError::Repository`] when persistence fails.
    pub async fn authenticate(&self, token: &TokenDigest) -> AccountServiceResult<User> {
        let access_token = self
            .repository
            .find_token(token)
            .await?
            .ok_or(AccountServiceError::InvalidToken)?;
        if access_token.is_expired_at(self.clock.utc()) {
            return Err(AccountServiceError::InvalidToken);
        }
        self.repository
            .find_user(access_token.user_id())
            .await?
            .ok_or(AccountServiceError::InvalidToken)
    }

    /// Retrieves a single user profile.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::UserNotFound`] when no user carries the
    /// identifier and [`AccountServiceError::Repository`] when persistence
    /// fails.
    pub async fn user(&self, id: UserId) -> AccountServiceResult<User> {
        self.repository
            .find_user(id)
            .await?
            .ok_or(AccountServiceError::UserNotFound(id))
    }

    /// Lists every registered user ordered by display name.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::Repository`] when persistence fails.
    pub async fn users(&self) -> AccountServiceResult<Vec<User>> {
        Ok(self.repository.list_users().await?)
    }
}
