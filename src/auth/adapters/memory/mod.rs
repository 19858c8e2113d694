//! In-memory adapter for the auth repository port.

mod repository;

pub use repository::InMemoryAuthRepository;
