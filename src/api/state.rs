//! Shared application state handed to every handler.

use crate::attachment::{ports::AttachmentRepository, services::AttachmentLibraryService};
use crate::auth::{ports::AuthRepository, services::AccountService};
use crate::project::{ports::ProjectRepository, services::ProjectCatalogService};
use crate::workflow::{ports::WorkflowRepository, services::TaskLifecycleService};
use mockable::DefaultClock;
use std::sync::Arc;

/// Account service instantiated over trait-object repositories.
pub type ApiAccountService = AccountService<Arc<dyn AuthRepository>, DefaultClock>;
/// Project catalogue service instantiated over trait-object repositories.
pub type ApiCatalogService =
    ProjectCatalogService<Arc<dyn ProjectRepository>, Arc<dyn AuthRepository>, DefaultClock>;
/// Task lifecycle service instantiated over trait-object repositories.
pub type ApiLifecycleService =
    TaskLifecycleService<Arc<dyn WorkflowRepository>, Arc<dyn ProjectRepository>, DefaultClock>;
/// Attachment library service instantiated over trait-object repositories.
pub type ApiLibraryService = AttachmentLibraryService<
    Arc<dyn AttachmentRepository>,
    Arc<dyn WorkflowRepository>,
    Arc<dyn ProjectRepository>,
    DefaultClock,
>;

/// The four orchestration services behind the REST surface.
///
/// Repositories are trait objects, so the same state type serves both
/// the in-memory and the PostgreSQL backing.
#[derive(Clone)]
pub struct AppState {
    accounts: ApiAccountService,
    catalog: ApiCatalogService,
    lifecycle: ApiLifecycleService,
    library: ApiLibraryService,
}

impl AppState {
    /// Wires the service layer over the given repository set.
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthRepository>,
        projects: Arc<dyn ProjectRepository>,
        workflow: Arc<dyn WorkflowRepository>,
        attachments: Arc<dyn AttachmentRepository>,
    ) -> Self {
        Self {
            accounts: AccountService::new(Arc::new(Arc::clone(&auth)), Arc::new(DefaultClock)),
            catalog: ProjectCatalogService::new(
                Arc::new(Arc::clone(&projects)),
                Arc::new(auth),
                Arc::new(DefaultClock),
            ),
            lifecycle: TaskLifecycleService::new(
                Arc::new(Arc::clone(&workflow)),
                Arc::new(Arc::clone(&projects)),
                Arc::new(DefaultClock),
            ),
            library: AttachmentLibraryService::new(
                Arc::new(attachments),
                Arc::new(workflow),
                Arc::new(projects),
                Arc::new(DefaultClock),
            ),
        }
    }

    /// Returns the account service.
    #[must_use]
    pub const fn accounts(&self) -> &ApiAccountService {
        &self.accounts
    }

    /// Returns the project catalogue service.
    #[must_use]
    pub const fn catalog(&self) -> &ApiCatalogService {
        &self.catalog
    }

    /// Returns the task lifecycle service.
    #[must_use]
    pub const fn lifecycle(&self) -> &ApiLifecycleService {
        &self.lifecycle
    }

    /// Returns the attachment library service.
    #[must_use]
    pub const fn library(&self) -> &ApiLibraryService {
        &self.library
    }
}
