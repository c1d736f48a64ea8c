//! Error types for collection domain validation.

use thiserror::Error;

/// Errors returned while constructing collection domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollectionDomainError {
    /// The network address is empty after trimming.
    #[error("appliance address must not be empty")]
    EmptyAddress,

    /// The address contains whitespace or a URL scheme/path separator.
    #[error("appliance address '{0}' must be a bare host name or IP address")]
    InvalidAddress(String),

    /// The management node name is empty after trimming.
    #[error("management node name must not be empty")]
    EmptyManagementNodeName,

    /// The credential username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The session key is empty after trimming.
    #[error("session key must not be empty")]
    EmptyApiKey,
}
