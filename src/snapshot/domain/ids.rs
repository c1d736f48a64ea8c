//! Identifiers for appliances and snapshots.

use super::SnapshotDomainError;
use crate::collection::domain::CollectionRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable appliance identifier: the serial number, or the host name when
/// no serial was reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplianceId(String);

/// Which record field an [`ApplianceId`] was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// The serial number.
    Serial,
    /// The host name, used because no serial was present.
    Hostname,
}

impl ApplianceId {
    /// Creates a validated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotDomainError::EmptyApplianceId`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, SnapshotDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(SnapshotDomainError::EmptyApplianceId);
        }
        Ok(Self(normalized))
    }

    /// Resolves the identifier for a record, preferring the serial.
    ///
    /// Returns `None` when the record carries neither serial nor hostname.
    #[must_use]
    pub fn resolve(record: &CollectionRecord) -> Option<(Self, IdentitySource)> {
        if let Some(id) = record.serial.as_deref().and_then(|serial| Self::new(serial).ok()) {
            return Some((id, IdentitySource::Serial));
        }
        record
            .hostname
            .as_deref()
            .and_then(|hostname| Self::new(hostname).ok())
            .map(|id| (id, IdentitySource::Hostname))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ApplianceId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ApplianceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(Uuid);

impl SnapshotId {
    /// Creates a new random snapshot identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a snapshot identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
