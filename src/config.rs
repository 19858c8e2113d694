//! Environment-driven server configuration.
//!
//! A `.env` file is honoured when present; real environment variables
//! win over it. `BOTTEGA_BIND_ADDR` picks the listen address,
//! `DATABASE_URL` switches persistence from the in-memory adapters to
//! PostgreSQL, and `BOTTEGA_SEED_DEMO=1` loads the demo fixture set.

use std::net::SocketAddr;
use thiserror::Error;

/// Default listen address when `BOTTEGA_BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8474";

/// Environment variable naming the listen address.
pub const BIND_ADDR_VAR: &str = "BOTTEGA_BIND_ADDR";
/// Environment variable naming the PostgreSQL connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Environment variable enabling the demo fixture set.
pub const SEED_DEMO_VAR: &str = "BOTTEGA_SEED_DEMO";

/// Errors raised while reading the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The bind address did not parse as `host:port`.
    #[error("invalid {BIND_ADDR_VAR} value {value:?}: {source}")]
    InvalidBindAddr {
        /// The rejected value.
        value: String,
        /// The parse failure.
        source: std::net::AddrParseError,
    },
}

/// Typed view of the server environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
    database_url: Option<String>,
    seed_demo: bool,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first if one
    /// exists; variables already set in the environment take precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddr`] when the configured bind
    /// address does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let raw_addr =
            std::env::var(BIND_ADDR_VAR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = raw_addr
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: raw_addr,
                source,
            })?;

        let database_url = std::env::var(DATABASE_URL_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty());
        let seed_demo = std::env::var(SEED_DEMO_VAR)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            bind_addr,
            database_url,
            seed_demo,
        })
    }

    /// Returns the address the HTTP server binds to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Returns the PostgreSQL connection string, when one is configured.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// Returns whether the demo fixture set should be loaded on start.
    #[must_use]
    pub const fn seed_demo(&self) -> bool {
        self.seed_demo
    }
}
