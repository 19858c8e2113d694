//! Adapter implementations for auth ports.

pub mod memory;
pub mod postgres;
