//! Maps collection records onto stored appliances and snapshots.

use crate::collection::domain::CollectionRecord;
use crate::snapshot::{
    domain::{Appliance, ApplianceId, IdentitySource, Snapshot, StoreOutcome},
    ports::{SnapshotRepository, SnapshotRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors returned when a single record cannot be stored.
#[derive(Debug, Clone, Error)]
pub enum SnapshotWriterError {
    /// The record has neither serial nor hostname.
    #[error("record has neither serial nor hostname")]
    MissingIdentifier,
    /// The repository failed.
    #[error(transparent)]
    Repository(#[from] SnapshotRepositoryError),
}

/// Per-batch write counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersistSummary {
    /// Snapshots newly written.
    pub inserted: usize,
    /// Records whose appliance and instant were already stored.
    pub duplicates: usize,
    /// Records without any identifier.
    pub skipped: usize,
    /// Records the repository failed to store.
    pub failed: usize,
}

impl PersistSummary {
    /// Returns the number of records considered.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.inserted + self.duplicates + self.skipped + self.failed
    }
}

/// Writes collection records through a [`SnapshotRepository`].
#[derive(Clone)]
pub struct SnapshotWriter<R>
where
    R: SnapshotRepository,
{
    repository: Arc<R>,
}

impl<R> SnapshotWriter<R>
where
    R: SnapshotRepository,
{
    /// Creates a writer.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns the underlying repository.
    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Stores one record as an appliance upsert plus a snapshot insert.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotWriterError::MissingIdentifier`] for records with
    /// no serial or hostname, and [`SnapshotWriterError::Repository`] when
    /// storage fails. A duplicate instant is not an error.
    pub async fn persist_one(
        &self,
        record: &CollectionRecord,
    ) -> Result<StoreOutcome, SnapshotWriterError> {
        let (id, source) =
            ApplianceId::resolve(record).ok_or(SnapshotWriterError::MissingIdentifier)?;
        if source == IdentitySource::Hostname {
            warn!(appliance = %id, "no serial reported; keying appliance by hostname");
        }
        let appliance = Appliance::from_record(id.clone(), record);
        let snapshot = Snapshot::from_record(id, record);
        Ok(self.repository.store(&appliance, &snapshot).await?)
    }

    /// Stores each record independently.
    ///
    /// One record's failure never prevents the rest from being written.
    pub async fn persist(&self, records: &[CollectionRecord]) -> PersistSummary {
        let mut summary = PersistSummary::default();
        for record in records {
            match self.persist_one(record).await {
                Ok(StoreOutcome::Inserted) => summary.inserted += 1,
                Ok(StoreOutcome::DuplicateIgnored) => {
                    debug!(
                        appliance = record.identifier().unwrap_or_default(),
                        collected_at = %record.collected_at,
                        "snapshot already stored; ignoring duplicate"
                    );
                    summary.duplicates += 1;
                }
                Err(SnapshotWriterError::MissingIdentifier) => {
                    warn!(
                        address = record.address.as_deref().unwrap_or_default(),
                        "skipping record without serial or hostname"
                    );
                    summary.skipped += 1;
                }
                Err(err) => {
                    warn!(
                        appliance = record.identifier().unwrap_or_default(),
                        error = %err,
                        "failed to store snapshot"
                    );
                    summary.failed += 1;
                }
            }
        }
        info!(
            inserted = summary.inserted,
            duplicates = summary.duplicates,
            skipped = summary.skipped,
            failed = summary.failed,
            "snapshot batch persisted"
        );
        summary
    }
}
