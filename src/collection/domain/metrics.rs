//! Typed field sets produced by the response parsers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Two-valued status flag rendered as `yes`/`no`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    /// Condition holds.
    Yes,
    /// Condition does not hold or was not observed.
    #[default]
    No,
}

impl YesNo {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    /// Interprets a stored flag; anything other than `yes` reads as `No`.
    #[must_use]
    pub fn from_flag(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("yes") {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// Device certificate presence as reported by the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CertificateState {
    /// A valid certificate with a known expiry is installed.
    #[serde(rename = "yes")]
    Valid,
    /// A certificate node exists but is not valid or lacks an expiry.
    #[serde(rename = "no")]
    Invalid,
    /// The appliance reported no certificate node at all.
    #[default]
    #[serde(rename = "")]
    Missing,
}

impl CertificateState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "yes",
            Self::Invalid => "no",
            Self::Missing => "",
        }
    }

    /// Interprets a stored flag (`yes`, `no`, or anything else as missing).
    #[must_use]
    pub fn from_flag(value: &str) -> Self {
        let normalized = value.trim();
        if normalized.eq_ignore_ascii_case("yes") {
            Self::Valid
        } else if normalized.eq_ignore_ascii_case("no") {
            Self::Invalid
        } else {
            Self::Missing
        }
    }
}

/// Software version and hardware model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemIdentity {
    /// Installed software version.
    pub software_version: Option<String>,
    /// Hardware or VM model.
    pub model: Option<String>,
}

/// CPU, memory, and swap figures extracted from resource text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceUsage {
    /// One-minute load average.
    pub cpu_one_min: Option<f64>,
    /// Memory utilization percentage rounded to two decimals.
    pub memory_usage: Option<f64>,
    /// Swap in use, in the unit the appliance reports (MiB).
    pub swap_used: Option<f64>,
}

/// Session table load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionLoad {
    /// Active session count.
    pub active: Option<u64>,
    /// Session capacity.
    pub capacity: Option<u64>,
}

/// Certificate validity and expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CertificateStatus {
    /// Presence and validity.
    pub state: CertificateState,
    /// Normalized expiry, kept even when the certificate is invalid.
    pub expires_at: Option<DateTime<Utc>>,
    /// Set when the expiry carried an unrecognized zone abbreviation.
    pub timezone_assumed: bool,
}

/// Disk utilization percentages keyed by `disk_<mount>_pct`.
///
/// The key set is discovered at runtime from the appliance's mount table.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct DiskUsage(BTreeMap<String, f64>);

impl DiskUsage {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the storage key for a mount path.
    ///
    /// `/` maps to `disk_root_pct`; `/opt/pancfg` maps to
    /// `disk_opt_pancfg_pct`.
    #[must_use]
    pub fn key_for_mount(mount: &str) -> String {
        let mount_key = if mount == "/" {
            String::from("root")
        } else {
            mount.trim_start_matches('/').replace('/', "_")
        };
        format!("disk_{mount_key}_pct")
    }

    /// Returns `true` when `key` has the `disk_<mount>_pct` shape.
    #[must_use]
    pub fn is_disk_key(key: &str) -> bool {
        key.strip_prefix("disk_")
            .and_then(|rest| rest.strip_suffix("_pct"))
            .is_some_and(|mount| !mount.is_empty())
    }

    /// Records utilization for a mount path.
    pub fn insert_mount(&mut self, mount: &str, percent: f64) {
        self.0.insert(Self::key_for_mount(mount), percent);
    }

    /// Records utilization under an already-derived key.
    pub fn insert_key(&mut self, key: impl Into<String>, percent: f64) {
        self.0.insert(key.into(), percent);
    }

    /// Returns utilization for a key such as `disk_root_pct`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Iterates keys and percentages in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }

    /// Returns the number of mounts recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no mounts were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merges `other` into `self`; keys present in `other` win.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

impl FromIterator<(String, f64)> for DiskUsage {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
