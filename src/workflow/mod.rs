//! Workflow context: tasks, deliveries, and QA reviews.
//!
//! The pipeline at the heart of the service. Tasks walk a seven-state
//! lifecycle, executors hand in versioned deliveries, and QA reviewers
//! close the loop with verdicts that push the task onwards or back.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
