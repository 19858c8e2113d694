//! In-memory repository for user accounts and access tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::auth::{
    domain::{AccessToken, EmailAddress, TokenDigest, User, UserId},
    ports::{AuthRepository, AuthRepositoryError, AuthRepositoryResult},
};

/// Thread-safe in-memory auth repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthRepository {
    state: Arc<RwLock<InMemoryAuthState>>,
}

#[derive(Debug, Default)]
struct InMemoryAuthState {
    users: HashMap<UserId, User>,
    email_index: HashMap<EmailAddress, UserId>,
    tokens: HashMap<TokenDigest, AccessToken>,
}

impl InMemoryAuthRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Maps a poisoned lock into the persistence error variant.
fn poisoned(err: impl std::fmt::Display) -> AuthRepositoryError {
    AuthRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AuthRepository for InMemoryAuthRepository {
    async fn store_user(&self, user: &User) -> AuthRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.users.contains_key(&user.id()) {
            return Err(AuthRepositoryError::DuplicateUser(user.id()));
        }
        if state.email_index.contains_key(user.email()) {
            return Err(AuthRepositoryError::DuplicateEmail(user.email().clone()));
        }

        state.email_index.insert(user.email().clone(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> AuthRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_user_by_email(
        &self,
        email: &EmailAddress,
    ) -> AuthRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(poisoned)?;
        let user = state
            .email_index
            .get(email)
            .and_then(|user_id| state.users.get(user_id))
            .cloned();
        Ok(user)
    }

    async fn list_users(&self) -> AuthRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| {
            a.full_name()
                .cmp(b.full_name())
                .then_with(|| a.email().as_str().cmp(b.email().as_str()))
        });
        Ok(users)
    }

    async fn store_token(&self, token: &AccessToken) -> AuthRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.tokens.contains_key(token.digest()) {
            return Err(AuthRepositoryError::DuplicateToken);
        }
        state.tokens.insert(token.digest().clone(), token.clone());
        Ok(())
    }

    async fn find_token(&self, digest: &TokenDigest) -> AuthRepositoryResult<Option<AccessToken>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tokens.get(digest).cloned())
    }

    async fn delete_token(&self, digest: &TokenDigest) -> AuthRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.tokens.remove(digest);
        Ok(())
    }

    async fn purge_expired_tokens(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AuthRepositoryResult<u64> {
        let mut state = self.state.write().map_err(poisoned)?;
        let before = state.tokens.len();
        state
            .tokens
            .retain(|_, token| token.user_id() != user_id || !token.is_expired_at(now));
        Ok((before - state.tokens.len()) as u64)
    }
}
