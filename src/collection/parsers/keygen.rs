//! Credential-exchange responses.

use super::xml::{descendant_text, find_descendant, parse_document, text_of};
use super::ResponseParseError;

/// Outcome of reading a keygen response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeygenResponse {
    /// The body carried a session key.
    Granted(String),
    /// No key; the vendor message, or a generic one when absent.
    Refused(String),
}

/// Reads the session key, or the vendor's refusal message, from a keygen
/// response.
///
/// # Errors
///
/// Returns [`ResponseParseError::MalformedXml`] when the body is not XML.
pub fn parse_keygen_response(body: &str) -> Result<KeygenResponse, ResponseParseError> {
    let document = parse_document(body)?;
    let root = document.root_element();
    if let Some(key) = find_descendant(root, "key").and_then(text_of) {
        return Ok(KeygenResponse::Granted(key));
    }
    let message = descendant_text(root, "msg").unwrap_or_else(|| String::from("Unknown error"));
    Ok(KeygenResponse::Refused(message))
}

/// Returns the vendor message when the body is an error envelope.
///
/// Envelopes look like `<response status="error"><msg>...</msg></response>`;
/// the message may be nested in `line` elements. Non-XML bodies are not
/// envelopes.
#[must_use]
pub fn vendor_error(body: &str) -> Option<String> {
    let document = parse_document(body).ok()?;
    let root = document.root_element();
    if !root.has_tag_name("response") || root.attribute("status") != Some("error") {
        return None;
    }
    let message = find_descendant(root, "msg")
        .map(|msg| {
            msg.descendants()
                .filter(|node| node.is_text())
                .filter_map(|node| node.text())
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty());
    Some(message.unwrap_or_else(|| String::from("request rejected")))
}
