//! Immutable per-instant metric snapshots.

use super::{ApplianceId, SnapshotId};
use crate::collection::domain::{CertificateState, CollectionRecord, DiskUsage, YesNo};
use chrono::{DateTime, SubsecRound, Utc};

/// Metric values captured in one snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapshotMetrics {
    /// Connectivity flag.
    pub connected: Option<String>,
    /// High-availability state.
    pub ha_state: Option<String>,
    /// One-minute load average.
    pub cpu_one_min: Option<f64>,
    /// Memory utilization percentage.
    pub memory_usage: Option<f64>,
    /// Swap in use.
    pub swap_used: Option<f64>,
    /// Active sessions.
    pub session_count: Option<u64>,
    /// Session capacity.
    pub session_max: Option<u64>,
    /// Logging-service connectivity.
    pub logging_service: YesNo,
    /// Device certificate presence.
    pub certificate: CertificateState,
    /// Device certificate expiry.
    pub certificate_expires_at: Option<DateTime<Utc>>,
    /// Expiry zone was unrecognized and taken as UTC.
    pub cert_timezone_assumed: bool,
    /// Runtime-discovered disk utilization.
    pub disks: DiskUsage,
}

impl From<&CollectionRecord> for SnapshotMetrics {
    fn from(record: &CollectionRecord) -> Self {
        Self {
            connected: record.connected.clone(),
            ha_state: record.ha_state.clone(),
            cpu_one_min: record.cpu_one_min,
            memory_usage: record.memory_usage,
            swap_used: record.swap_used,
            session_count: record.session_count,
            session_max: record.session_max,
            logging_service: record.logging_service,
            certificate: record.certificate,
            certificate_expires_at: record.certificate_expires_at,
            cert_timezone_assumed: record.cert_timezone_assumed,
            disks: record.disks.clone(),
        }
    }
}

/// One appliance's metrics at one instant. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    id: SnapshotId,
    appliance_id: ApplianceId,
    collected_at: DateTime<Utc>,
    metrics: SnapshotMetrics,
}

/// Stored snapshot fields, as read back from persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSnapshotData {
    /// Identifier.
    pub id: SnapshotId,
    /// Owning appliance.
    pub appliance_id: ApplianceId,
    /// Collection instant.
    pub collected_at: DateTime<Utc>,
    /// Metric values.
    pub metrics: SnapshotMetrics,
}

impl Snapshot {
    /// Creates a snapshot of `record` for `appliance_id`.
    #[must_use]
    pub fn from_record(appliance_id: ApplianceId, record: &CollectionRecord) -> Self {
        Self {
            id: SnapshotId::new(),
            appliance_id,
            collected_at: record.collected_at.trunc_subsecs(0),
            metrics: SnapshotMetrics::from(record),
        }
    }

    /// Reconstructs a snapshot from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSnapshotData) -> Self {
        Self {
            id: data.id,
            appliance_id: data.appliance_id,
            collected_at: data.collected_at,
            metrics: data.metrics,
        }
    }

    /// Returns the snapshot identifier.
    #[must_use]
    pub const fn id(&self) -> SnapshotId {
        self.id
    }

    /// Returns the owning appliance.
    #[must_use]
    pub const fn appliance_id(&self) -> &ApplianceId {
        &self.appliance_id
    }

    /// Returns the collection instant.
    #[must_use]
    pub const fn collected_at(&self) -> DateTime<Utc> {
        self.collected_at
    }

    /// Returns the metric values.
    #[must_use]
    pub const fn metrics(&self) -> &SnapshotMetrics {
        &self.metrics
    }
}

/// Result of storing one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// A new snapshot row was written.
    Inserted,
    /// A snapshot for the same appliance and instant already existed.
    DuplicateIgnored,
}
