//! Panmetrics: firewall fleet health collection.
//!
//! The collector asks one or more management nodes which appliances they
//! manage, queries each appliance for session, system, resource, disk,
//! logging-service, and certificate state, and stores the merged readings
//! as time-stamped snapshots.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types and parsing with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (HTTP, database)
//!
//! # Modules
//!
//! - [`collection`]: Discovery, session keys, and metric collection
//! - [`snapshot`]: Snapshot persistence and batch ingest
//! - [`config`]: YAML configuration loading
//! - [`fs`]: Capability-based file helpers

pub mod collection;
pub mod config;
pub mod fs;
pub mod snapshot;
