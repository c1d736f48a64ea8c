//! The canonical per-appliance collection record.

use super::timestamp::canonical_utc;
use super::{
    ApplianceDescriptor, CertificateState, CertificateStatus, DiskUsage, ResourceUsage,
    SessionLoad, SystemIdentity, YesNo,
};
use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;

/// One appliance's health at one collection instant.
///
/// Every field is always present; uncollected metrics stay `None` (or the
/// flag's default). The serialized form is the batch ingestion record shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionRecord {
    /// Host name.
    pub hostname: Option<String>,
    /// Serial number.
    pub serial: Option<String>,
    /// Management address.
    #[serde(rename = "ip")]
    pub address: Option<String>,
    /// Logical name of the management node that reported the appliance.
    #[serde(rename = "panorama")]
    pub management_node: Option<String>,
    /// Connectivity flag.
    pub connected: Option<String>,
    /// High-availability state.
    pub ha_state: Option<String>,
    /// Collection instant at second precision.
    #[serde(rename = "timestamp", serialize_with = "canonical_utc::serialize")]
    pub collected_at: DateTime<Utc>,
    /// Installed software version.
    #[serde(rename = "pan_os_version")]
    pub software_version: Option<String>,
    /// Hardware model.
    pub model: Option<String>,
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
    #[serde(rename = "device_certificate")]
    pub certificate: CertificateState,
    /// Device certificate expiry.
    #[serde(
        rename = "device_cert_exp",
        serialize_with = "canonical_utc::option::serialize"
    )]
    pub certificate_expires_at: Option<DateTime<Utc>>,
    /// Set when the certificate expiry zone was unrecognized and taken as UTC.
    pub cert_timezone_assumed: bool,
    /// Runtime-discovered disk utilization keyed by `disk_<mount>_pct`.
    #[serde(flatten)]
    pub disks: DiskUsage,
}

impl CollectionRecord {
    /// Creates a record holding only identity fields.
    #[must_use]
    pub fn from_descriptor(descriptor: &ApplianceDescriptor, collected_at: DateTime<Utc>) -> Self {
        Self {
            hostname: descriptor.hostname.clone(),
            serial: descriptor.serial.clone(),
            address: descriptor
                .address
                .as_ref()
                .map(|address| address.as_str().to_owned()),
            management_node: Some(descriptor.management_node.as_str().to_owned()),
            connected: descriptor.connected.clone(),
            ha_state: descriptor.ha_state.clone(),
            model: descriptor.model.clone(),
            ..Self::empty(collected_at)
        }
    }

    /// Creates a record with no identity and no metrics.
    #[must_use]
    pub fn empty(collected_at: DateTime<Utc>) -> Self {
        Self {
            hostname: None,
            serial: None,
            address: None,
            management_node: None,
            connected: None,
            ha_state: None,
            collected_at: collected_at.trunc_subsecs(0),
            software_version: None,
            model: None,
            cpu_one_min: None,
            memory_usage: None,
            swap_used: None,
            session_count: None,
            session_max: None,
            logging_service: YesNo::No,
            certificate: CertificateState::Missing,
            certificate_expires_at: None,
            cert_timezone_assumed: false,
            disks: DiskUsage::new(),
        }
    }

    /// Merges a parser's output field by field.
    ///
    /// Fields the patch leaves `None` keep their current value; fields it
    /// carries overwrite. Disk keys are merged, not replaced.
    pub fn apply(&mut self, patch: RecordPatch) {
        merge(&mut self.software_version, patch.software_version);
        merge(&mut self.model, patch.model);
        merge(&mut self.cpu_one_min, patch.cpu_one_min);
        merge(&mut self.memory_usage, patch.memory_usage);
        merge(&mut self.swap_used, patch.swap_used);
        merge(&mut self.session_count, patch.session_count);
        merge(&mut self.session_max, patch.session_max);
        if let Some(status) = patch.logging_service {
            self.logging_service = status;
        }
        if let Some(certificate) = patch.certificate {
            self.certificate = certificate.state;
            self.certificate_expires_at = certificate.expires_at;
            self.cert_timezone_assumed = certificate.timezone_assumed;
        }
        self.disks.merge(patch.disks);
    }

    /// Returns the identifier the snapshot store keys on: serial, else
    /// hostname.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        non_blank(self.serial.as_deref()).or_else(|| non_blank(self.hostname.as_deref()))
    }
}

fn merge<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Partial field set produced by one parser.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordPatch {
    /// Installed software version.
    pub software_version: Option<String>,
    /// Hardware model.
    pub model: Option<String>,
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
    pub logging_service: Option<YesNo>,
    /// Certificate state and expiry, applied together.
    pub certificate: Option<CertificateStatus>,
    /// Disk utilization.
    pub disks: DiskUsage,
}

impl From<SystemIdentity> for RecordPatch {
    fn from(identity: SystemIdentity) -> Self {
        Self {
            software_version: identity.software_version,
            model: identity.model,
            ..Self::default()
        }
    }
}

impl From<ResourceUsage> for RecordPatch {
    fn from(usage: ResourceUsage) -> Self {
        Self {
            cpu_one_min: usage.cpu_one_min,
            memory_usage: usage.memory_usage,
            swap_used: usage.swap_used,
            ..Self::default()
        }
    }
}

impl From<SessionLoad> for RecordPatch {
    fn from(load: SessionLoad) -> Self {
        Self {
            session_count: load.active,
            session_max: load.capacity,
            ..Self::default()
        }
    }
}

impl From<DiskUsage> for RecordPatch {
    fn from(disks: DiskUsage) -> Self {
        Self {
            disks,
            ..Self::default()
        }
    }
}

impl From<YesNo> for RecordPatch {
    fn from(status: YesNo) -> Self {
        Self {
            logging_service: Some(status),
            ..Self::default()
        }
    }
}

impl From<CertificateStatus> for RecordPatch {
    fn from(status: CertificateStatus) -> Self {
        Self {
            certificate: Some(status),
            ..Self::default()
        }
    }
}
