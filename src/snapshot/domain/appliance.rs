//! Appliance identity and mutable inventory facts.

use super::ApplianceId;
use crate::collection::domain::CollectionRecord;

/// A stored appliance.
///
/// Descriptive fields follow "new value if non-empty, else keep existing"
/// precedence when a newer record arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appliance {
    id: ApplianceId,
    hostname: Option<String>,
    address: Option<String>,
    management_node: Option<String>,
    model: Option<String>,
    software_version: Option<String>,
}

/// Stored appliance fields, as read back from persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedApplianceData {
    /// Identifier.
    pub id: ApplianceId,
    /// Host name.
    pub hostname: Option<String>,
    /// Management address.
    pub address: Option<String>,
    /// Management node name.
    pub management_node: Option<String>,
    /// Hardware model.
    pub model: Option<String>,
    /// Software version.
    pub software_version: Option<String>,
}

impl Appliance {
    /// Builds the appliance facts carried by `record`.
    #[must_use]
    pub fn from_record(id: ApplianceId, record: &CollectionRecord) -> Self {
        Self {
            id,
            hostname: non_empty(record.hostname.as_deref()),
            address: non_empty(record.address.as_deref()),
            management_node: non_empty(record.management_node.as_deref()),
            model: non_empty(record.model.as_deref()),
            software_version: non_empty(record.software_version.as_deref()),
        }
    }

    /// Reconstructs an appliance from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedApplianceData) -> Self {
        Self {
            id: data.id,
            hostname: data.hostname,
            address: data.address,
            management_node: data.management_node,
            model: data.model,
            software_version: data.software_version,
        }
    }

    /// Applies newer facts; empty incoming fields keep the current value.
    pub fn absorb(&mut self, incoming: &Self) {
        overwrite(&mut self.hostname, incoming.hostname.as_ref());
        overwrite(&mut self.address, incoming.address.as_ref());
        overwrite(&mut self.management_node, incoming.management_node.as_ref());
        overwrite(&mut self.model, incoming.model.as_ref());
        overwrite(&mut self.software_version, incoming.software_version.as_ref());
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> &ApplianceId {
        &self.id
    }

    /// Returns the host name, if known.
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    /// Returns the host name, falling back to the identifier.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.hostname().unwrap_or_else(|| self.id.as_str())
    }

    /// Returns the management address.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Returns the management node name.
    #[must_use]
    pub fn management_node(&self) -> Option<&str> {
        self.management_node.as_deref()
    }

    /// Returns the hardware model.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Returns the software version.
    #[must_use]
    pub fn software_version(&self) -> Option<&str> {
        self.software_version.as_deref()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

fn overwrite(slot: &mut Option<String>, incoming: Option<&String>) {
    if let Some(value) = incoming.filter(|text| !text.is_empty()) {
        *slot = Some(value.clone());
    }
}
