//! Test suite for the project context.
