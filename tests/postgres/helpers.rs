//! Shared helpers for PostgreSQL integration tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use once_cell::sync::Lazy;
use tokio::sync::{Mutex, MutexGuard};

/// Boxed error type for test plumbing.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SQL creating the full schema.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-08-20-000000_create_base_tables/up.sql");

/// SQL dropping the full schema.
pub const DROP_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-08-20-000000_create_base_tables/down.sql");

/// Environment variable naming the test database.
pub const TEST_DATABASE_URL_VAR: &str = "BOTTEGA_TEST_DATABASE_URL";

static DB_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Exclusive access to the test database with a fresh schema.
pub struct TestDatabase {
    pool: Pool<ConnectionManager<PgConnection>>,
    _guard: MutexGuard<'static, ()>,
}

impl TestDatabase {
    /// Returns a connection pool for the test database.
    pub fn pool(&self) -> Pool<ConnectionManager<PgConnection>> {
        self.pool.clone()
    }
}

/// Acquires the test database, or `None` when the gate variable is
/// unset.
///
/// The schema is dropped and recreated under the global lock, so tests
/// never observe each other's rows.
///
/// # Errors
///
/// Returns an error when connecting or applying the schema fails.
pub async fn checkout() -> Result<Option<TestDatabase>, BoxError> {
    let Some(url) = std::env::var(TEST_DATABASE_URL_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
    else {
        return Ok(None);
    };

    let guard = DB_LOCK.lock().await;
    let reset_url = url.clone();
    tokio::task::spawn_blocking(move || -> Result<(), BoxError> {
        let mut conn = PgConnection::establish(&reset_url)?;
        conn.batch_execute(DROP_SCHEMA_SQL)?;
        conn.batch_execute(CREATE_SCHEMA_SQL)?;
        Ok(())
    })
    .await??;

    let pool = Pool::builder()
        .max_size(2)
        .build(ConnectionManager::new(url))?;
    Ok(Some(TestDatabase {
        pool,
        _guard: guard,
    }))
}
