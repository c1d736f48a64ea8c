//! In-memory adapter.

mod repository;

pub use repository::InMemorySnapshotRepository;
