//! Repository port for appliance and snapshot persistence.

use crate::snapshot::domain::{Appliance, ApplianceId, Snapshot, StoreOutcome};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for snapshot repository operations.
pub type SnapshotRepositoryResult<T> = Result<T, SnapshotRepositoryError>;

/// Snapshot persistence contract.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Upserts `appliance` and inserts `snapshot` as one unit.
    ///
    /// Descriptive appliance fields use non-empty-wins precedence against
    /// what is already stored. A snapshot whose appliance and instant are
    /// already stored is not an error; it yields
    /// [`StoreOutcome::DuplicateIgnored`] and the whole unit is discarded,
    /// appliance update included.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotRepositoryError::Persistence`] when the backing
    /// store fails.
    async fn store(
        &self,
        appliance: &Appliance,
        snapshot: &Snapshot,
    ) -> SnapshotRepositoryResult<StoreOutcome>;

    /// Finds an appliance by identifier.
    ///
    /// Returns `None` when the appliance has never been stored.
    async fn find_appliance(&self, id: &ApplianceId) -> SnapshotRepositoryResult<Option<Appliance>>;

    /// Returns an appliance's snapshots, oldest first.
    async fn snapshots_for(&self, id: &ApplianceId) -> SnapshotRepositoryResult<Vec<Snapshot>>;
}

/// Errors returned by snapshot repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SnapshotRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),

    /// A stored row could not be mapped back to the domain.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(String),
}

impl SnapshotRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
