//! Attachment context: polymorphic file and link references.
//!
//! Attachments hang off tasks, deliveries, or reviews, distinguished by a
//! context tag next to the parent identifier. Binary storage is delegated
//! elsewhere; an attachment only carries a URL.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
