//! `PostgreSQL` adapters for snapshot persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresSnapshotRepository, SnapshotPgPool};
