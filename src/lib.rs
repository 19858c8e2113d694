//! Bottega: a QA delivery-review service.
//!
//! This crate provides the core functionality for running QA-driven project
//! work: organizers assemble projects and rosters, members file tasks,
//! executors submit versioned deliveries, and QA reviewers render verdicts
//! that drive each task through a fixed workflow.
//!
//! # Architecture
//!
//! Bottega follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`auth`]: User accounts and bearer-token sessions
//! - [`project`]: Projects and role-based membership
//! - [`workflow`]: Task lifecycle, deliveries, and QA reviews
//! - [`attachment`]: Polymorphic attachment records
//! - [`api`]: REST surface over the service layer
//! - [`config`]: Environment-driven server configuration
//! - [`seed`]: Demo fixture data

pub mod api;
pub mod attachment;
pub mod auth;
pub mod config;
pub mod project;
pub mod seed;
pub mod workflow;
