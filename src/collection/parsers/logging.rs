//! Logging-service forwarding connectivity.

use super::xml::{child_text, find_descendant, find_descendants, parse_document, text_of};
use super::ResponseParseError;
use crate::collection::domain::YesNo;
use regex::Regex;
use std::sync::LazyLock;

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static ACTIVE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bactive\b").expect("valid active regex"));

/// Reports whether logging-service forwarding is connected.
///
/// Any `conn-status` node containing the word "Active", or a
/// `ConnStatus/msg` summary mentioning "established", reads as `Yes`.
/// Everything else is `No`.
///
/// # Errors
///
/// Returns [`ResponseParseError::MalformedXml`] when the body is not XML.
pub fn parse_logging_service(body: &str) -> Result<YesNo, ResponseParseError> {
    let document = parse_document(body)?;
    let root = document.root_element();

    let active = find_descendants(root, "conn-status")
        .filter_map(text_of)
        .any(|status| ACTIVE_TOKEN.is_match(&status));
    if active {
        return Ok(YesNo::Yes);
    }

    let established = find_descendant(root, "ConnStatus")
        .and_then(|summary| child_text(summary, "msg"))
        .is_some_and(|message| message.to_lowercase().contains("established"));
    Ok(if established { YesNo::Yes } else { YesNo::No })
}
