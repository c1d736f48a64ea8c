//! Per-appliance metric collection.

use super::session_keys::SessionKeyCache;
use crate::collection::domain::{
    ApiKey, ApplianceAddress, ApplianceDescriptor, CollectionRecord, Credentials, MetricKind,
    RecordPatch,
};
use crate::collection::parsers::{ResponseParseError, parse_metric};
use crate::collection::ports::{DeviceApi, DeviceApiError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Why a single metric was left uncollected.
#[derive(Debug, Clone, Error)]
pub enum MetricCollectionError {
    /// The command failed in transport or was rejected.
    #[error(transparent)]
    Api(#[from] DeviceApiError),
    /// The response could not be interpreted.
    #[error(transparent)]
    Parse(#[from] ResponseParseError),
}

impl MetricCollectionError {
    /// Returns `true` when the session key was refused.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_unauthorized())
    }
}

/// Gathers the six metrics for one appliance into a record.
pub struct ApplianceCollector<A, C>
where
    A: DeviceApi,
    C: Clock + Send + Sync,
{
    api: Arc<A>,
    keys: Arc<SessionKeyCache>,
    clock: Arc<C>,
}

impl<A, C> ApplianceCollector<A, C>
where
    A: DeviceApi,
    C: Clock + Send + Sync,
{
    /// Creates a collector sharing `keys` with other collectors.
    #[must_use]
    pub const fn new(api: Arc<A>, keys: Arc<SessionKeyCache>, clock: Arc<C>) -> Self {
        Self { api, keys, clock }
    }

    /// Returns the session key cache.
    #[must_use]
    pub fn session_keys(&self) -> &SessionKeyCache {
        &self.keys
    }

    /// Collects a full record for `descriptor`.
    ///
    /// Never fails: a missing address or key yields an identity-only record,
    /// and each failing metric leaves only its own fields unset.
    pub async fn collect(
        &self,
        descriptor: &ApplianceDescriptor,
        credentials: &Credentials,
    ) -> CollectionRecord {
        self.collect_until(descriptor, credentials, None).await
    }

    /// Collects like [`Self::collect`], stopping before the next command
    /// once `deadline` has passed.
    ///
    /// A command already in flight runs to completion and its fields are
    /// merged; the record is otherwise partial.
    #[instrument(
        skip_all,
        fields(
            appliance = descriptor.label(),
            management_node = %descriptor.management_node,
        )
    )]
    pub async fn collect_until(
        &self,
        descriptor: &ApplianceDescriptor,
        credentials: &Credentials,
        deadline: Option<Instant>,
    ) -> CollectionRecord {
        let mut record = CollectionRecord::from_descriptor(descriptor, self.clock.utc());
        let Some(address) = descriptor.address.as_ref() else {
            debug!("appliance has no address; recording identity only");
            return record;
        };

        let key = match self.keys.obtain_key(self.api.as_ref(), address, credentials).await {
            Ok(key) => key,
            Err(err) => {
                warn!(address = %address, error = %err, "no session key; recording identity only");
                return record;
            }
        };

        for kind in MetricKind::ALL {
            if deadline.is_some_and(|limit| Instant::now() >= limit) {
                warn!(address = %address, next = %kind, "run deadline reached; record is partial");
                break;
            }
            match self.collect_metric(address, &key, kind).await {
                Ok(patch) => record.apply(patch),
                Err(err) => {
                    if err.is_unauthorized() {
                        self.keys.evict(address);
                    }
                    warn!(address = %address, metric = %kind, error = %err, "metric not collected");
                }
            }
        }
        record
    }

    async fn collect_metric(
        &self,
        address: &ApplianceAddress,
        key: &ApiKey,
        kind: MetricKind,
    ) -> Result<RecordPatch, MetricCollectionError> {
        let body = self.api.run_command(address, key, kind.command()).await?;
        Ok(parse_metric(kind, &body)?)
    }
}
