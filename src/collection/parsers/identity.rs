//! System identity: software version and model.

use super::xml::{descendant_text, parse_document};
use super::ResponseParseError;
use crate::collection::domain::SystemIdentity;

/// Extracts `sw-version` and `model` from a system info response.
///
/// # Errors
///
/// Returns [`ResponseParseError::MalformedXml`] when the body is not XML.
pub fn parse_system_identity(body: &str) -> Result<SystemIdentity, ResponseParseError> {
    let document = parse_document(body)?;
    let root = document.root_element();
    Ok(SystemIdentity {
        software_version: descendant_text(root, "sw-version"),
        model: descendant_text(root, "model"),
    })
}
