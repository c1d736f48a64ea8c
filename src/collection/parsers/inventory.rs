//! Connected-appliance inventory reported by a management node.

use super::xml::{child_text, find_child, find_descendants, parse_document};
use super::ResponseParseError;
use crate::collection::domain::{ApplianceAddress, DiscoveredAppliance};
use roxmltree::Node;

/// Extracts appliance entries from a connected-devices response.
///
/// Entries with none of hostname, serial, or address are dropped.
///
/// # Errors
///
/// Returns [`ResponseParseError::MalformedXml`] when the body is not XML.
pub fn parse_connected_devices(body: &str) -> Result<Vec<DiscoveredAppliance>, ResponseParseError> {
    let document = parse_document(body)?;
    Ok(find_descendants(document.root_element(), "entry")
        .map(discovered_appliance)
        .filter(|appliance| !appliance.is_placeholder())
        .collect())
}

fn discovered_appliance(entry: Node<'_, '_>) -> DiscoveredAppliance {
    DiscoveredAppliance {
        hostname: child_text(entry, "hostname"),
        serial: child_text(entry, "serial"),
        model: child_text(entry, "model"),
        address: child_text(entry, "ip-address")
            .and_then(|raw| ApplianceAddress::new(raw).ok()),
        connected: child_text(entry, "connected"),
        ha_state: find_child(entry, "ha").and_then(|ha| child_text(ha, "state")),
    }
}
