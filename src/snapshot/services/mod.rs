//! Snapshot persistence services.

pub mod ingest;
pub mod writer;

pub use ingest::{BatchIngestError, BatchIngestService};
pub use writer::{PersistSummary, SnapshotWriter, SnapshotWriterError};
