//! `PostgreSQL` repository implementation for user and token storage.

use super::{
    models::{AccessTokenRow, NewAccessTokenRow, NewUserRow, UserRow},
    schema::{access_tokens, users},
};
use crate::auth::{
    domain::{
        AccessToken, AccessTokenId, EmailAddress, PasswordHash, PersistedAccessTokenData,
        PersistedUserData, TokenDigest, User, UserId,
    },
    ports::{AuthRepository, AuthRepositoryError, AuthRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by auth adapters.
pub type AuthPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed auth repository.
#[derive(Debug, Clone)]
pub struct PostgresAuthRepository {
    pool: AuthPgPool,
}

impl PostgresAuthRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AuthPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AuthRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AuthRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AuthRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AuthRepositoryError::persistence)?
    }
}

#[async_trait]
impl AuthRepository for PostgresAuthRepository {
    async fn store_user(&self, user: &User) -> AuthRepositoryResult<()> {
        let user_id = user.id();
        let email = user.email().clone();
        let new_row = user_to_new_row(user);

        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_email_unique_violation(info.as_ref()) =>
                    {
                        AuthRepositoryError::DuplicateEmail(email.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        AuthRepositoryError::DuplicateUser(user_id)
                    }
                    _ => AuthRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_user(&self, id: UserId) -> AuthRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(AuthRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_user_by_email(
        &self,
        email: &EmailAddress,
    ) -> AuthRepositoryResult<Option<User>> {
        let lookup = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::email.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(AuthRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list_users(&self) -> AuthRepositoryResult<Vec<User>> {
        self.run_blocking(|connection| {
            let rows = users::table
                .order((users::full_name.asc(), users::email.asc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(AuthRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn store_token(&self, token: &AccessToken) -> AuthRepositoryResult<()> {
        let new_row = token_to_new_row(token);
        self.run_blocking(move |connection| {
            diesel::insert_into(access_tokens::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        AuthRepositoryError::DuplicateToken
                    }
                    _ => AuthRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_token(&self, digest: &TokenDigest) -> AuthRepositoryResult<Option<AccessToken>> {
        let lookup = digest.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = access_tokens::table
                .filter(access_tokens::token.eq(lookup))
                .select(AccessTokenRow::as_select())
                .first::<AccessTokenRow>(connection)
                .optional()
                .map_err(AuthRepositoryError::persistence)?;
            row.map(row_to_token).transpose()
        })
        .await
    }

    async fn delete_token(&self, digest: &TokenDigest) -> AuthRepositoryResult<()> {
        let lookup = digest.as_str().to_owned();
        self.run_blocking(move |connection| {
            diesel::delete(access_tokens::table.filter(access_tokens::token.eq(lookup)))
                .execute(connection)
                .map_err(AuthRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn purge_expired_tokens(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AuthRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                access_tokens::table
                    .filter(access_tokens::user_id.eq(user_id.into_inner()))
                    .filter(access_tokens::expires_at.le(now)),
            )
            .execute(connection)
            .map_err(AuthRepositoryError::persistence)?;
            Ok(removed as u64)
        })
        .await
    }
}

fn user_to_new_row(user: &User) -> NewUserRow {
    NewUserRow {
        id: user.id().into_inner(),
        full_name: user.full_name().to_owned(),
        email: user.email().as_str().to_owned(),
        password_hash: user.password_hash().as_str().to_owned(),
        avatar_url: user.avatar_url().map(ToOwned::to_owned),
        created_at: user.created_at(),
    }
}

fn row_to_user(row: UserRow) -> AuthRepositoryResult<User> {
    let email = EmailAddress::new(row.email).map_err(AuthRepositoryError::persistence)?;
    let data = PersistedUserData {
        id: UserId::from_uuid(row.id),
        full_name: row.full_name,
        email,
        password_hash: PasswordHash::from_phc_string(row.password_hash),
        avatar_url: row.avatar_url,
        created_at: row.created_at,
    };
    Ok(User::from_persisted(data))
}

fn token_to_new_row(token: &AccessToken) -> NewAccessTokenRow {
    NewAccessTokenRow {
        id: token.id().into_inner(),
        user_id: token.user_id().into_inner(),
        token: token.digest().as_str().to_owned(),
        expires_at: token.expires_at(),
        created_at: token.created_at(),
    }
}

fn row_to_token(row: AccessTokenRow) -> AuthRepositoryResult<AccessToken> {
    let digest =
        TokenDigest::try_from(row.token.as_str()).map_err(AuthRepositoryError::persistence)?;
    let data = PersistedAccessTokenData {
        id: AccessTokenId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        digest,
        expires_at: row.expires_at,
        created_at: row.created_at,
    };
    Ok(AccessToken::from_persisted(data))
}

fn is_email_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_users_email_unique")
}
