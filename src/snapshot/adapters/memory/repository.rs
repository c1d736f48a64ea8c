//! In-memory snapshot repository for tests and `--no-persist` dry runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::snapshot::{
    domain::{Appliance, ApplianceId, Snapshot, StoreOutcome},
    ports::{SnapshotRepository, SnapshotRepositoryError, SnapshotRepositoryResult},
};

/// Thread-safe in-memory snapshot repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotRepository {
    state: Arc<RwLock<InMemorySnapshotState>>,
}

#[derive(Debug, Default)]
struct InMemorySnapshotState {
    appliances: HashMap<ApplianceId, Appliance>,
    snapshots: HashMap<ApplianceId, BTreeMap<DateTime<Utc>, Snapshot>>,
}

impl InMemorySnapshotRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn snapshot_count(&self) -> SnapshotRepositoryResult<usize> {
        let state = self.state.read().map_err(|err| {
            SnapshotRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.snapshots.values().map(BTreeMap::len).sum())
    }
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshotRepository {
    async fn store(
        &self,
        appliance: &Appliance,
        snapshot: &Snapshot,
    ) -> SnapshotRepositoryResult<StoreOutcome> {
        let mut state = self.state.write().map_err(|err| {
            SnapshotRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let duplicate = state
            .snapshots
            .get(snapshot.appliance_id())
            .is_some_and(|history| history.contains_key(&snapshot.collected_at()));
        if duplicate {
            return Ok(StoreOutcome::DuplicateIgnored);
        }

        state
            .appliances
            .entry(appliance.id().clone())
            .and_modify(|existing| existing.absorb(appliance))
            .or_insert_with(|| appliance.clone());
        state
            .snapshots
            .entry(snapshot.appliance_id().clone())
            .or_default()
            .insert(snapshot.collected_at(), snapshot.clone());
        Ok(StoreOutcome::Inserted)
    }

    async fn find_appliance(&self, id: &ApplianceId) -> SnapshotRepositoryResult<Option<Appliance>> {
        let state = self.state.read().map_err(|err| {
            SnapshotRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.appliances.get(id).cloned())
    }

    async fn snapshots_for(&self, id: &ApplianceId) -> SnapshotRepositoryResult<Vec<Snapshot>> {
        let state = self.state.read().map_err(|err| {
            SnapshotRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .snapshots
            .get(id)
            .map(|history| history.values().cloned().collect())
            .unwrap_or_default())
    }
}
