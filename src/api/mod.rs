//! REST surface over the service layer.
//!
//! An axum router exposing the account, project, workflow, and attachment
//! operations as JSON endpoints. Every route except login, register, and
//! the health probe sits behind a bearer-token extractor; service errors
//! are translated into HTTP status codes in [`error`].

mod error;
mod extract;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ErrorBody};
pub use routes::router;
pub use state::AppState;
