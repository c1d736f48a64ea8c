//! Per-address session key acquisition and caching.

use crate::collection::domain::{ApiKey, ApplianceAddress, Credentials};
use crate::collection::parsers::{KeygenResponse, ResponseParseError, parse_keygen_response};
use crate::collection::ports::{DeviceApi, DeviceApiError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::debug;

/// Errors returned by a credential exchange.
#[derive(Debug, Clone, Error)]
pub enum KeyExchangeError {
    /// The request failed or returned a non-success status.
    #[error(transparent)]
    Transport(#[from] DeviceApiError),

    /// The response carried no key.
    #[error("{address} refused credential exchange: {message}")]
    Rejected {
        /// Target address.
        address: ApplianceAddress,
        /// Vendor-reported message.
        message: String,
    },

    /// The response body could not be read.
    #[error("unreadable credential exchange response from {address}: {source}")]
    Malformed {
        /// Target address.
        address: ApplianceAddress,
        /// Parser failure.
        source: ResponseParseError,
    },
}

/// Performs one credential exchange against `address`, without caching.
///
/// # Errors
///
/// Returns [`KeyExchangeError`] when the request fails or yields no key.
pub async fn exchange_key<A>(
    api: &A,
    address: &ApplianceAddress,
    credentials: &Credentials,
) -> Result<ApiKey, KeyExchangeError>
where
    A: DeviceApi + ?Sized,
{
    let body = api.request_key(address, credentials).await?;
    let response = parse_keygen_response(&body).map_err(|source| KeyExchangeError::Malformed {
        address: address.clone(),
        source,
    })?;
    match response {
        KeygenResponse::Granted(raw) => {
            ApiKey::new(raw).map_err(|err| KeyExchangeError::Rejected {
                address: address.clone(),
                message: err.to_string(),
            })
        }
        KeygenResponse::Refused(message) => Err(KeyExchangeError::Rejected {
            address: address.clone(),
            message,
        }),
    }
}

type KeySlot = Arc<tokio::sync::Mutex<Option<ApiKey>>>;

/// Process-local cache holding at most one session key per address.
///
/// Concurrent callers for the same address share a single exchange; a
/// failed exchange leaves nothing cached.
#[derive(Debug, Default)]
pub struct SessionKeyCache {
    slots: Mutex<HashMap<ApplianceAddress, KeySlot>>,
}

impl SessionKeyCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached key for `address`, exchanging credentials first
    /// when none is cached.
    ///
    /// # Errors
    ///
    /// Returns [`KeyExchangeError`] when the exchange fails.
    pub async fn obtain_key<A>(
        &self,
        api: &A,
        address: &ApplianceAddress,
        credentials: &Credentials,
    ) -> Result<ApiKey, KeyExchangeError>
    where
        A: DeviceApi + ?Sized,
    {
        let slot = self.slot(address);
        let mut cached = slot.lock().await;
        if let Some(key) = cached.as_ref() {
            return Ok(key.clone());
        }
        let key = exchange_key(api, address, credentials).await?;
        debug!(address = %address, "session key cached");
        *cached = Some(key.clone());
        Ok(key)
    }

    /// Drops the entry for `address` so the next caller re-authenticates.
    pub fn evict(&self, address: &ApplianceAddress) {
        let removed = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(address);
        if removed.is_some() {
            debug!(address = %address, "session key evicted");
        }
    }

    /// Returns the cached key for `address` without exchanging.
    pub async fn cached(&self, address: &ApplianceAddress) -> Option<ApiKey> {
        let slot = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address)
            .cloned()?;
        let cached = slot.lock().await;
        cached.clone()
    }

    fn slot(&self, address: &ApplianceAddress) -> KeySlot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(address.clone()).or_default())
    }
}
