//! Test suite for the auth context.

mod service_tests;
