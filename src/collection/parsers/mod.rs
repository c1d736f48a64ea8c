//! Pure parsers turning management API responses into typed field sets.
//!
//! Parsers never abort the caller because expected structure is missing:
//! absent nodes or unmatched patterns produce `None` fields. Only bodies
//! that are not XML at all, or that lack a node the command cannot be read
//! without, produce a [`ResponseParseError`].

mod certificate;
mod disk;
mod identity;
mod inventory;
mod keygen;
mod logging;
mod resources;
mod session;
mod xml;

pub use certificate::parse_certificate;
pub use disk::{parse_disk_table, parse_disk_usage};
pub use identity::parse_system_identity;
pub use inventory::parse_connected_devices;
pub use keygen::{KeygenResponse, parse_keygen_response, vendor_error};
pub use logging::parse_logging_service;
pub use resources::{parse_resource_text, parse_resources};
pub use session::parse_session;

use crate::collection::domain::{MetricKind, RecordPatch};
use thiserror::Error;

/// Errors raised when a response cannot be interpreted at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResponseParseError {
    /// The body is not well-formed XML.
    #[error("malformed XML response: {0}")]
    MalformedXml(String),

    /// A node required to interpret the response is absent.
    #[error("response is missing required element <{0}>")]
    MissingElement(&'static str),
}

/// Parses the response to `kind`'s command into a record patch.
///
/// # Errors
///
/// Propagates the per-metric parser's [`ResponseParseError`].
pub fn parse_metric(kind: MetricKind, body: &str) -> Result<RecordPatch, ResponseParseError> {
    let patch = match kind {
        MetricKind::Session => parse_session(body)?.into(),
        MetricKind::SystemIdentity => parse_system_identity(body)?.into(),
        MetricKind::Resources => parse_resources(body)?.into(),
        MetricKind::DiskUsage => parse_disk_usage(body)?.into(),
        MetricKind::LoggingService => parse_logging_service(body)?.into(),
        MetricKind::Certificate => parse_certificate(body)?.into(),
    };
    Ok(patch)
}
