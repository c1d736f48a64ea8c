//! Snapshot storage.
//!
//! Persists collection records as an appliance row plus one metric snapshot
//! per collection instant, and ingests previously exported batches.
//!
//! - Domain types in [`domain`]
//! - Repository contract in [`ports`]
//! - In-memory and `PostgreSQL` repositories in [`adapters`]
//! - Writer and batch ingest in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
