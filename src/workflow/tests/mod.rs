//! Test suite for the workflow context.

mod domain_tests;
