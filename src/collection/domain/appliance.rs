//! Management nodes and the appliance descriptors they report.

use super::{ApplianceAddress, ManagementNodeName};

/// A configured management node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementNode {
    name: ManagementNodeName,
    address: ApplianceAddress,
}

impl ManagementNode {
    /// Creates a management node definition.
    #[must_use]
    pub const fn new(name: ManagementNodeName, address: ApplianceAddress) -> Self {
        Self { name, address }
    }

    /// Returns the logical name used to tag discovered appliances.
    #[must_use]
    pub const fn name(&self) -> &ManagementNodeName {
        &self.name
    }

    /// Returns the network address.
    #[must_use]
    pub const fn address(&self) -> &ApplianceAddress {
        &self.address
    }
}

/// Inventory entry parsed from a management node before tagging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscoveredAppliance {
    /// Host name.
    pub hostname: Option<String>,
    /// Serial number.
    pub serial: Option<String>,
    /// Hardware model.
    pub model: Option<String>,
    /// Management address.
    pub address: Option<ApplianceAddress>,
    /// Connectivity flag as reported by the management node.
    pub connected: Option<String>,
    /// High-availability state.
    pub ha_state: Option<String>,
}

impl DiscoveredAppliance {
    /// Returns `true` when hostname, serial, and address are all absent.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.hostname.is_none() && self.serial.is_none() && self.address.is_none()
    }

    /// Tags the entry with the management node that reported it.
    #[must_use]
    pub fn managed_by(self, management_node: ManagementNodeName) -> ApplianceDescriptor {
        ApplianceDescriptor {
            hostname: self.hostname,
            serial: self.serial,
            model: self.model,
            address: self.address,
            connected: self.connected,
            ha_state: self.ha_state,
            management_node,
        }
    }
}

/// An appliance to collect from, tagged with its management node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplianceDescriptor {
    /// Host name.
    pub hostname: Option<String>,
    /// Serial number.
    pub serial: Option<String>,
    /// Hardware model.
    pub model: Option<String>,
    /// Management address; without one nothing beyond identity is
    /// collectible.
    pub address: Option<ApplianceAddress>,
    /// Connectivity flag as reported by the management node.
    pub connected: Option<String>,
    /// High-availability state.
    pub ha_state: Option<String>,
    /// Logical name of the originating management node.
    pub management_node: ManagementNodeName,
}

impl ApplianceDescriptor {
    /// Returns the best available label for log output.
    #[must_use]
    pub fn label(&self) -> &str {
        self.hostname
            .as_deref()
            .or(self.serial.as_deref())
            .or_else(|| self.address.as_ref().map(ApplianceAddress::as_str))
            .unwrap_or("<unnamed>")
    }
}
