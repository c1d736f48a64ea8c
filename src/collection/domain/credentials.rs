//! Credentials and session keys.
//!
//! Both types redact their secret material in `Debug` output so they can be
//! carried through instrumented spans without leaking into logs.

use super::CollectionDomainError;
use std::fmt;

/// Username and password used for credential exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates credentials.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionDomainError::EmptyUsername`] when the username is
    /// blank.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CollectionDomainError> {
        let normalized = username.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(CollectionDomainError::EmptyUsername);
        }
        Ok(Self {
            username: normalized,
            password: password.into(),
        })
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// API session key returned by a credential exchange.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a session key.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionDomainError::EmptyApiKey`] when the key is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, CollectionDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(CollectionDomainError::EmptyApiKey);
        }
        Ok(Self(normalized))
    }

    /// Returns the raw key for use in a request.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("ApiKey(<redacted>)")
    }
}
