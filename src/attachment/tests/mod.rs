//! Test suite for the attachment context.
