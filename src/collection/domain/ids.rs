//! Validated identifiers for appliances and management nodes.

use super::CollectionDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Network address of a management node or appliance.
///
/// Holds a bare host name or IP address; the transport adapter decides the
/// scheme and path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplianceAddress(String);

impl ApplianceAddress {
    /// Creates a validated address.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionDomainError::EmptyAddress`] for blank input and
    /// [`CollectionDomainError::InvalidAddress`] when the value contains
    /// whitespace or a `/`.
    pub fn new(value: impl Into<String>) -> Result<Self, CollectionDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(CollectionDomainError::EmptyAddress);
        }
        if normalized
            .chars()
            .any(|character| character.is_whitespace() || character == '/')
        {
            return Err(CollectionDomainError::InvalidAddress(normalized));
        }
        Ok(Self(normalized))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ApplianceAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ApplianceAddress {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Logical name of a management node, used to tag discovered appliances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManagementNodeName(String);

impl ManagementNodeName {
    /// Creates a validated management node name.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionDomainError::EmptyManagementNodeName`] for blank
    /// input.
    pub fn new(value: impl Into<String>) -> Result<Self, CollectionDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(CollectionDomainError::EmptyManagementNodeName);
        }
        Ok(Self(normalized))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ManagementNodeName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ManagementNodeName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
