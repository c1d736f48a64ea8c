//! Adapter implementations for snapshot ports.

pub mod memory;
pub mod postgres;

pub use memory::InMemorySnapshotRepository;
pub use postgres::{PostgresSnapshotRepository, SnapshotPgPool};
