//! Session table load.

use super::xml::{child_text, find_descendant, parse_document};
use super::ResponseParseError;
use crate::collection::domain::SessionLoad;
use roxmltree::Node;

/// Active-count field names in priority order.
const ACTIVE_FIELDS: [&str; 2] = ["num-active", "active"];

/// Capacity field names in priority order; product lines disagree.
const CAPACITY_FIELDS: [&str; 4] = ["num-max", "max", "limit", "session-limit"];

/// Extracts active and maximum session counts.
///
/// The first non-empty field in each priority list wins; its value is then
/// read as a count, with `n/a` or non-numeric text giving `None`.
///
/// # Errors
///
/// Returns [`ResponseParseError::MalformedXml`] for non-XML bodies and
/// [`ResponseParseError::MissingElement`] when there is no `result` node.
pub fn parse_session(body: &str) -> Result<SessionLoad, ResponseParseError> {
    let document = parse_document(body)?;
    let result = find_descendant(document.root_element(), "result")
        .ok_or(ResponseParseError::MissingElement("result"))?;
    Ok(SessionLoad {
        active: first_populated(result, &ACTIVE_FIELDS).and_then(|raw| parse_count(&raw)),
        capacity: first_populated(result, &CAPACITY_FIELDS).and_then(|raw| parse_count(&raw)),
    })
}

fn first_populated(result: Node<'_, '_>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| child_text(result, name))
}

fn parse_count(raw: &str) -> Option<u64> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("n/a") {
        return None;
    }
    value.parse().ok()
}
