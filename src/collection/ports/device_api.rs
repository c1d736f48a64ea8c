//! Transport port for the HTTP+XML management API.

use crate::collection::domain::{ApiKey, ApplianceAddress, Credentials, OperationalCommand};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for management API calls.
pub type DeviceApiResult<T> = Result<T, DeviceApiError>;

/// Management API contract shared by management nodes and appliances.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// Performs a credential exchange and returns the raw response body.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceApiError`] when the request fails or the server
    /// answers with a non-success status.
    async fn request_key(
        &self,
        address: &ApplianceAddress,
        credentials: &Credentials,
    ) -> DeviceApiResult<String>;

    /// Runs an operational command and returns the raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceApiError::Unauthorized`] when the key is rejected,
    /// [`DeviceApiError::Rejected`] for vendor error envelopes, and other
    /// variants for transport failures.
    async fn run_command(
        &self,
        address: &ApplianceAddress,
        key: &ApiKey,
        command: OperationalCommand,
    ) -> DeviceApiResult<String>;
}

/// Errors returned by [`DeviceApi`] implementations.
#[derive(Debug, Clone, Error)]
pub enum DeviceApiError {
    /// The request did not complete within the configured timeout.
    #[error("request to {address} timed out")]
    Timeout {
        /// Target address.
        address: ApplianceAddress,
    },

    /// The server refused the session key or credentials (HTTP 401/403).
    #[error("request to {address} was not authorized (HTTP {status})")]
    Unauthorized {
        /// Target address.
        address: ApplianceAddress,
        /// HTTP status code.
        status: u16,
    },

    /// The server answered with another non-success HTTP status.
    #[error("request to {address} failed with HTTP {status}")]
    Status {
        /// Target address.
        address: ApplianceAddress,
        /// HTTP status code.
        status: u16,
    },

    /// The server answered with a vendor error envelope.
    #[error("{address} rejected the request: {message}")]
    Rejected {
        /// Target address.
        address: ApplianceAddress,
        /// Vendor-reported message.
        message: String,
    },

    /// Connection-level failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl DeviceApiError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Returns `true` when the failure means the session key is no longer
    /// accepted.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
