//! Diesel row models for user and access token persistence.

use super::schema::{access_tokens, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub full_name: String,
    /// Normalized email address.
    pub email: String,
    /// PBKDF2 hash in PHC string format.
    pub password_hash: String,
    /// Optional avatar URL.
    pub avatar_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub full_name: String,
    /// Normalized email address.
    pub email: String,
    /// PBKDF2 hash in PHC string format.
    pub password_hash: String,
    /// Optional avatar URL.
    pub avatar_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for access token records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = access_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AccessTokenRow {
    /// Token identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub user_id: uuid::Uuid,
    /// SHA-256 digest presented by clients.
    pub token: String,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for access token records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = access_tokens)]
pub struct NewAccessTokenRow {
    /// Token identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub user_id: uuid::Uuid,
    /// SHA-256 digest presented by clients.
    pub token: String,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
