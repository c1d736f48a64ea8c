//! Device certificate validity and expiry.

use super::xml::{child_text, find_descendant, parse_document};
use super::ResponseParseError;
use crate::collection::domain::{
    CertificateState, CertificateStatus, TimezonePolicy, normalize_timestamp,
};

/// Extracts certificate state from a device certificate status response.
///
/// The certificate is valid when `validity` is `valid` or `status` contains
/// `success`. It is reported as `Valid` only if the expiry also normalizes;
/// an invalid certificate still carries its expiry.
///
/// # Errors
///
/// Returns [`ResponseParseError::MalformedXml`] when the body is not XML.
pub fn parse_certificate(body: &str) -> Result<CertificateStatus, ResponseParseError> {
    let document = parse_document(body)?;
    let Some(certificate) = find_descendant(document.root_element(), "device-certificate") else {
        return Ok(CertificateStatus::default());
    };

    let validity = child_text(certificate, "validity").unwrap_or_default();
    let status = child_text(certificate, "status").unwrap_or_default();
    let expiry = child_text(certificate, "not_valid_after")
        .and_then(|raw| normalize_timestamp(&raw, TimezonePolicy::Detect));

    let is_valid =
        validity.eq_ignore_ascii_case("valid") || status.to_lowercase().contains("success");
    let state = if is_valid && expiry.is_some() {
        CertificateState::Valid
    } else {
        CertificateState::Invalid
    };

    Ok(CertificateStatus {
        state,
        expires_at: expiry.map(|normalized| normalized.instant()),
        timezone_assumed: expiry.is_some_and(|normalized| normalized.timezone_assumed()),
    })
}
