//! Adapter implementations for the project context.

pub mod memory;
pub mod postgres;
