//! Collection services: key management, discovery, per-appliance
//! collection, and the fleet run.

pub mod collector;
pub mod discovery;
pub mod run;
pub mod session_keys;

pub use collector::{ApplianceCollector, MetricCollectionError};
pub use discovery::{
    DiscoveryError, InventoryDiscoveryService, InventoryReport, ManagementNodeFailure,
    NodeDiscoveryError,
};
pub use run::{CollectionRunError, CollectionRunService, FleetCollection, RunReport, RunSettings};
pub use session_keys::{KeyExchangeError, SessionKeyCache, exchange_key};
