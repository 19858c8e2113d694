//! Project context: the catalogue of projects and their member rosters.
//!
//! A project gathers a roster of users under explicit roles. The roster is
//! the authorisation surface for the whole service: task, delivery, and
//! attachment operations all ask the project who may act.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
