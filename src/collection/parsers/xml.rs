//! Thin helpers over `roxmltree` mirroring the lookups the parsers need.

use super::ResponseParseError;
use roxmltree::{Document, Node};

/// Parses a response body into a document.
pub(super) fn parse_document(body: &str) -> Result<Document<'_>, ResponseParseError> {
    Document::parse(body).map_err(|err| ResponseParseError::MalformedXml(err.to_string()))
}

/// First element named `name` strictly below `node`, in document order.
pub(super) fn find_descendant<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .find(|candidate| candidate.is_element() && candidate.has_tag_name(name))
}

/// Every element named `name` strictly below `node`, in document order.
pub(super) fn find_descendants<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants()
        .skip(1)
        .filter(move |candidate| candidate.is_element() && candidate.has_tag_name(name))
}

/// First direct child element named `name`.
pub(super) fn find_child<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|candidate| candidate.is_element() && candidate.has_tag_name(name))
}

/// Trimmed text of a node, or `None` when empty.
pub(super) fn text_of(node: Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

/// Trimmed, non-empty text of the first direct child named `name`.
pub(super) fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    find_child(node, name).and_then(text_of)
}

/// Trimmed, non-empty text of the first descendant named `name`.
pub(super) fn descendant_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    find_descendant(node, name).and_then(text_of)
}

/// Raw text content of the first `result` element, or an empty string.
///
/// Free-form command output (resources, disk space) arrives as the text of
/// `result`; whitespace is preserved for line-oriented parsing.
pub(super) fn result_text(body: &str) -> Result<String, ResponseParseError> {
    let document = parse_document(body)?;
    Ok(find_descendant(document.root_element(), "result")
        .and_then(|node| node.text())
        .unwrap_or_default()
        .to_owned())
}
