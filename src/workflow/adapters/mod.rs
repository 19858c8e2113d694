//! Adapter implementations for the workflow context.

pub mod memory;
pub mod postgres;
