//! Error types for snapshot domain validation.

use thiserror::Error;

/// Errors returned while constructing snapshot domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SnapshotDomainError {
    /// The appliance identifier is empty after trimming.
    #[error("appliance identifier must not be empty")]
    EmptyApplianceId,
}

/// Errors returned while reading a batch ingestion document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BatchFormatError {
    /// The document is not valid JSON.
    #[error("batch document is not valid JSON: {0}")]
    InvalidJson(String),

    /// The top level is neither a list nor an object with a `devices` list.
    #[error("unexpected batch shape; expected a list of devices or an object with a `devices` list")]
    UnexpectedShape,

    /// A list item is not a JSON object.
    #[error("batch record {index} is not an object")]
    NonObjectRecord {
        /// Zero-based position in the list.
        index: usize,
    },
}
