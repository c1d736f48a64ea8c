//! Fleet health collection.
//!
//! Discovers appliances through configured management nodes, exchanges
//! credentials for per-address session keys, issues the metric commands,
//! and merges the parsed responses into one [`domain::CollectionRecord`]
//! per appliance. Layout:
//!
//! - Domain types in [`domain`]
//! - Response parsers in [`parsers`]
//! - The management API port in [`ports`]
//! - HTTP and scripted transports in [`adapters`]
//! - Discovery, collection, and run orchestration in [`services`]

pub mod adapters;
pub mod domain;
pub mod parsers;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
