//! Domain model for persisted appliances and metric snapshots.

mod appliance;
mod batch;
mod coercion;
mod error;
mod ids;
mod snapshot;

pub use appliance::{Appliance, PersistedApplianceData};
pub use batch::{BatchDocument, BatchRecord};
pub use coercion::{coerce_bool, coerce_f64, coerce_string, coerce_u64};
pub use error::{BatchFormatError, SnapshotDomainError};
pub use ids::{ApplianceId, IdentitySource, SnapshotId};
pub use snapshot::{PersistedSnapshotData, Snapshot, SnapshotMetrics, StoreOutcome};
