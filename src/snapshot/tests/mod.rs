//! Unit tests for the snapshot context.

mod batch_tests;
mod writer_tests;
