//! One collection cycle: discover, collect concurrently, persist.

use super::collector::ApplianceCollector;
use super::discovery::{DiscoveryError, InventoryDiscoveryService, ManagementNodeFailure};
use super::session_keys::SessionKeyCache;
use crate::collection::domain::{
    ApplianceDescriptor, CollectionRecord, Credentials, ManagementNode,
};
use crate::collection::ports::DeviceApi;
use crate::snapshot::{
    ports::SnapshotRepository,
    services::{PersistSummary, SnapshotWriter},
};
use futures::stream::{self, StreamExt};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{info, instrument, warn};

/// Fatal errors that abort a collection run.
#[derive(Debug, Clone, Error)]
pub enum CollectionRunError {
    /// Discovery produced no usable inventory.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Concurrency and time bounds for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    /// Maximum appliances collected at once.
    pub concurrency: usize,
    /// Wall-clock budget for the whole cycle.
    pub deadline: Option<Duration>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            concurrency: 8,
            deadline: Some(Duration::from_secs(300)),
        }
    }
}

/// Records produced by one collection cycle.
#[derive(Debug, Clone, Default)]
pub struct FleetCollection {
    /// One record per appliance collected, in completion order.
    pub records: Vec<CollectionRecord>,
    /// Management nodes skipped during discovery.
    pub failed_nodes: Vec<ManagementNodeFailure>,
    /// Appliances not started because the deadline had passed.
    pub skipped_after_deadline: usize,
}

/// Outcome of a collection run that also persisted its records.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// What was collected.
    pub collection: FleetCollection,
    /// What was written.
    pub persisted: PersistSummary,
}

/// Runs discovery and collection across the fleet.
pub struct CollectionRunService<A, C>
where
    A: DeviceApi,
    C: Clock + Send + Sync,
{
    discovery: InventoryDiscoveryService<A>,
    collector: ApplianceCollector<A, C>,
    settings: RunSettings,
}

impl<A, C> CollectionRunService<A, C>
where
    A: DeviceApi,
    C: Clock + Send + Sync,
{
    /// Creates a run service.
    #[must_use]
    pub const fn new(
        discovery: InventoryDiscoveryService<A>,
        collector: ApplianceCollector<A, C>,
        settings: RunSettings,
    ) -> Self {
        Self {
            discovery,
            collector,
            settings,
        }
    }

    /// Builds the discovery and collection services around one shared API
    /// client and key cache.
    #[must_use]
    pub fn from_parts(
        api: Arc<A>,
        keys: Arc<SessionKeyCache>,
        clock: Arc<C>,
        settings: RunSettings,
    ) -> Self {
        Self::new(
            InventoryDiscoveryService::new(Arc::clone(&api)),
            ApplianceCollector::new(api, keys, clock),
            settings,
        )
    }

    /// Returns the per-appliance collector.
    #[must_use]
    pub const fn collector(&self) -> &ApplianceCollector<A, C> {
        &self.collector
    }

    /// Discovers appliances and collects a record for each.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionRunError::Discovery`] when no management node
    /// could be queried.
    #[instrument(skip_all, fields(nodes = nodes.len()))]
    pub async fn collect_fleet(
        &self,
        nodes: &[ManagementNode],
        credentials: &Credentials,
    ) -> Result<FleetCollection, CollectionRunError> {
        let deadline = self.settings.deadline.map(|budget| Instant::now() + budget);
        let inventory = self.discovery.discover(nodes, credentials).await?;
        let mut collection = self
            .collect_appliances(inventory.appliances, credentials, deadline)
            .await;
        collection.failed_nodes = inventory.failed_nodes;
        info!(
            records = collection.records.len(),
            failed_nodes = collection.failed_nodes.len(),
            skipped_after_deadline = collection.skipped_after_deadline,
            "collection cycle finished"
        );
        Ok(collection)
    }

    /// Collects records for already-discovered appliances.
    ///
    /// At most `concurrency` appliances are in flight. Appliances not yet
    /// started when `deadline` passes are skipped; those in flight finish
    /// their current command and return partial records.
    pub async fn collect_appliances(
        &self,
        appliances: Vec<ApplianceDescriptor>,
        credentials: &Credentials,
        deadline: Option<Instant>,
    ) -> FleetCollection {
        let collector = &self.collector;
        let outcomes: Vec<Option<CollectionRecord>> = stream::iter(appliances)
            .map(move |descriptor| async move {
                if deadline.is_some_and(|limit| Instant::now() >= limit) {
                    warn!(
                        appliance = descriptor.label(),
                        "run deadline passed before collection started; skipping"
                    );
                    return None;
                }
                Some(
                    collector
                        .collect_until(&descriptor, credentials, deadline)
                        .await,
                )
            })
            .buffer_unordered(self.settings.concurrency.max(1))
            .collect()
            .await;

        let skipped_after_deadline = outcomes.iter().filter(|outcome| outcome.is_none()).count();
        FleetCollection {
            records: outcomes.into_iter().flatten().collect(),
            failed_nodes: Vec::new(),
            skipped_after_deadline,
        }
    }

    /// Runs a full cycle and persists every record through `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionRunError::Discovery`] when no management node
    /// could be queried. Storage failures are per record and reported in
    /// the summary.
    pub async fn run<R>(
        &self,
        nodes: &[ManagementNode],
        credentials: &Credentials,
        writer: &SnapshotWriter<R>,
    ) -> Result<RunReport, CollectionRunError>
    where
        R: SnapshotRepository,
    {
        let collection = self.collect_fleet(nodes, credentials).await?;
        let persisted = writer.persist(&collection.records).await;
        Ok(RunReport {
            collection,
            persisted,
        })
    }
}
