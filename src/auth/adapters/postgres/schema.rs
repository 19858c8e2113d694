//! Diesel schema for user and access token persistence.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        full_name -> Varchar,
        /// Normalized email address.
        #[max_length = 255]
        email -> Varchar,
        /// PBKDF2 hash in PHC string format.
        password_hash -> Text,
        /// Optional avatar URL.
        #[max_length = 500]
        avatar_url -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bearer access tokens with server-side expiry.
    access_tokens (id) {
        /// Token identifier.
        id -> Uuid,
        /// Owning user identifier.
        user_id -> Uuid,
        /// SHA-256 digest presented by clients.
        #[max_length = 64]
        token -> Varchar,
        /// Expiry timestamp.
        expires_at -> Timestamptz,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
