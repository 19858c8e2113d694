//! In-memory integration tests driving the service layer end to end.
//!
//! Tests are organized into modules by bounded context:
//! - `account_tests`: registration, login, token lifecycle
//! - `project_tests`: catalogue CRUD and roster handling
//! - `workflow_tests`: the delivery-review pipeline across services
//! - `attachment_tests`: polymorphic attachments over a live pipeline

mod in_memory {
    pub mod helpers;

    mod account_tests;
    mod attachment_tests;
    mod project_tests;
    mod workflow_tests;
}
