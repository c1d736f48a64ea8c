//! Shared world state for collection run BDD scenarios.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::test_helpers::fleet::{management_node, script_management_node};
use mockable::DefaultClock;
use panmetrics::collection::adapters::ScriptedDeviceApi;
use panmetrics::collection::domain::{CollectionRecord, ManagementNode};
use panmetrics::collection::services::{
    CollectionRunError, CollectionRunService, RunReport, RunSettings, SessionKeyCache,
};
use panmetrics::snapshot::{adapters::InMemorySnapshotRepository, services::SnapshotWriter};
use rstest::fixture;

/// Run service type used by the BDD world.
pub type TestRunService = CollectionRunService<ScriptedDeviceApi, DefaultClock>;

/// Scenario world for collection run behaviour tests.
pub struct CollectionWorld {
    /// Scripted management API shared by nodes and appliances.
    pub api: Arc<ScriptedDeviceApi>,
    /// Configured management nodes in declaration order.
    pub nodes: Vec<ManagementNode>,
    /// Node addresses keyed by node name.
    pub node_addresses: BTreeMap<String, String>,
    /// Inventory each node reports, as `(serial, ip)` pairs.
    pub inventories: BTreeMap<String, Vec<(String, String)>>,
    /// Snapshot store written by the run.
    pub repository: Arc<InMemorySnapshotRepository>,
    /// Outcome of the last run.
    pub last_run: Option<Result<RunReport, CollectionRunError>>,
}

impl CollectionWorld {
    /// Creates a world with an empty fleet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api: Arc::new(ScriptedDeviceApi::new()),
            nodes: Vec::new(),
            node_addresses: BTreeMap::new(),
            inventories: BTreeMap::new(),
            repository: Arc::new(InMemorySnapshotRepository::new()),
            last_run: None,
        }
    }

    /// Registers a management node with an empty inventory.
    pub fn add_node(&mut self, name: &str, ip: &str) {
        self.nodes.push(management_node(name, ip));
        self.node_addresses.insert(name.to_owned(), ip.to_owned());
        self.inventories.insert(name.to_owned(), Vec::new());
        script_management_node(&self.api, ip, &[]);
    }

    /// Re-scripts a node's inventory response from the world state.
    pub fn publish_inventory(&self, name: &str) -> Result<(), eyre::Report> {
        let ip = self
            .node_addresses
            .get(name)
            .ok_or_else(|| eyre::eyre!("unknown management node '{name}'"))?;
        let entries = self.inventories.get(name).cloned().unwrap_or_default();
        script_management_node(&self.api, ip, &entries);
        Ok(())
    }

    /// Builds the run service under test.
    pub fn service(&self) -> TestRunService {
        CollectionRunService::from_parts(
            Arc::clone(&self.api),
            Arc::new(SessionKeyCache::new()),
            Arc::new(DefaultClock),
            RunSettings {
                concurrency: 4,
                deadline: None,
            },
        )
    }

    /// Returns a writer over the world's repository.
    pub fn writer(&self) -> SnapshotWriter<InMemorySnapshotRepository> {
        SnapshotWriter::new(Arc::clone(&self.repository))
    }

    /// Returns the successful run report.
    pub fn report(&self) -> Result<&RunReport, eyre::Report> {
        match self.last_run.as_ref() {
            Some(Ok(report)) => Ok(report),
            Some(Err(err)) => Err(eyre::eyre!("collection run failed: {err}")),
            None => Err(eyre::eyre!("collection run has not executed")),
        }
    }

    /// Returns the collected record for `serial`.
    pub fn record(&self, serial: &str) -> Result<&CollectionRecord, eyre::Report> {
        self.report()?
            .collection
            .records
            .iter()
            .find(|record| record.serial.as_deref() == Some(serial))
            .ok_or_else(|| eyre::eyre!("no record collected for '{serial}'"))
    }
}

impl Default for CollectionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> CollectionWorld {
    CollectionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
