//! Service layer for the project context.

mod catalog;

pub use catalog::{
    CreateProjectRequest, MemberSpec, ProjectCatalogError, ProjectCatalogResult,
    ProjectCatalogService, UpdateProjectRequest,
};
