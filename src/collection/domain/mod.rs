//! Domain model for fleet health collection.
//!
//! Identity values, credentials, the metric field sets produced by the
//! response parsers, the merged per-appliance record, and timestamp
//! normalization. Nothing here performs I/O.

mod appliance;
mod command;
mod credentials;
mod error;
mod ids;
mod metrics;
mod record;
pub mod timestamp;

pub use appliance::{ApplianceDescriptor, DiscoveredAppliance, ManagementNode};
pub use command::{MetricKind, OperationalCommand};
pub use credentials::{ApiKey, Credentials};
pub use error::CollectionDomainError;
pub use ids::{ApplianceAddress, ManagementNodeName};
pub use metrics::{
    CertificateState, CertificateStatus, DiskUsage, ResourceUsage, SessionLoad, SystemIdentity,
    YesNo,
};
pub use record::{CollectionRecord, RecordPatch};
pub use timestamp::{NormalizedTimestamp, TimezonePolicy, format_canonical, normalize_timestamp};
