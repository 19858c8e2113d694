//! Adapter implementations for the attachment context.

pub mod memory;
pub mod postgres;
