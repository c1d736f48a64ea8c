//! Unit tests for the collection context.

mod fixtures;
mod record_tests;
