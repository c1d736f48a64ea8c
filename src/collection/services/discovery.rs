//! Appliance inventory discovery through management nodes.

use super::session_keys::{KeyExchangeError, exchange_key};
use crate::collection::domain::{
    ApplianceDescriptor, Credentials, ManagementNode, ManagementNodeName, OperationalCommand,
};
use crate::collection::parsers::{ResponseParseError, parse_connected_devices};
use crate::collection::ports::{DeviceApi, DeviceApiError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Why a single management node contributed no appliances.
#[derive(Debug, Clone, Error)]
pub enum NodeDiscoveryError {
    /// No management-node key could be obtained.
    #[error(transparent)]
    KeyExchange(#[from] KeyExchangeError),
    /// The inventory command failed.
    #[error(transparent)]
    Command(#[from] DeviceApiError),
    /// The inventory response was unreadable.
    #[error(transparent)]
    Parse(#[from] ResponseParseError),
}

/// A management node skipped during discovery.
#[derive(Debug, Clone)]
pub struct ManagementNodeFailure {
    /// Name of the skipped node.
    pub node: ManagementNodeName,
    /// Failure cause.
    pub reason: NodeDiscoveryError,
}

/// Fatal discovery errors.
#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    /// No management nodes were configured.
    #[error("no management nodes configured")]
    NoManagementNodes,
    /// Every configured management node failed.
    #[error("none of the {attempted} management nodes could be reached")]
    NoReachableManagementNode {
        /// Number of nodes tried.
        attempted: usize,
        /// Per-node causes.
        failures: Vec<ManagementNodeFailure>,
    },
}

/// Appliances discovered in one pass, plus the nodes that were skipped.
#[derive(Debug, Clone, Default)]
pub struct InventoryReport {
    /// Descriptors tagged with their management node.
    pub appliances: Vec<ApplianceDescriptor>,
    /// Nodes that could not be queried.
    pub failed_nodes: Vec<ManagementNodeFailure>,
}

/// Queries each management node for its connected appliances.
#[derive(Clone)]
pub struct InventoryDiscoveryService<A>
where
    A: DeviceApi,
{
    api: Arc<A>,
}

impl<A> InventoryDiscoveryService<A>
where
    A: DeviceApi,
{
    /// Creates a discovery service.
    #[must_use]
    pub const fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Discovers appliances across all `nodes`.
    ///
    /// A node that cannot be reached is logged and skipped. The management
    /// key obtained for each node is used for the inventory query only and
    /// is never cached for appliance use.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::NoManagementNodes`] for an empty node list
    /// and [`DiscoveryError::NoReachableManagementNode`] when every node
    /// fails.
    #[instrument(skip_all, fields(nodes = nodes.len()))]
    pub async fn discover(
        &self,
        nodes: &[ManagementNode],
        credentials: &Credentials,
    ) -> Result<InventoryReport, DiscoveryError> {
        if nodes.is_empty() {
            return Err(DiscoveryError::NoManagementNodes);
        }

        let mut report = InventoryReport::default();
        for node in nodes {
            match self.discover_node(node, credentials).await {
                Ok(appliances) => {
                    info!(
                        management_node = %node.name(),
                        appliances = appliances.len(),
                        "management node inventory retrieved"
                    );
                    report.appliances.extend(appliances);
                }
                Err(reason) => {
                    warn!(
                        management_node = %node.name(),
                        address = %node.address(),
                        error = %reason,
                        "skipping unreachable management node"
                    );
                    report.failed_nodes.push(ManagementNodeFailure {
                        node: node.name().clone(),
                        reason,
                    });
                }
            }
        }

        if report.failed_nodes.len() == nodes.len() {
            return Err(DiscoveryError::NoReachableManagementNode {
                attempted: nodes.len(),
                failures: report.failed_nodes,
            });
        }
        Ok(report)
    }

    async fn discover_node(
        &self,
        node: &ManagementNode,
        credentials: &Credentials,
    ) -> Result<Vec<ApplianceDescriptor>, NodeDiscoveryError> {
        let key = exchange_key(self.api.as_ref(), node.address(), credentials).await?;
        let body = self
            .api
            .run_command(node.address(), &key, OperationalCommand::ShowConnectedDevices)
            .await?;
        let appliances = parse_connected_devices(&body)?
            .into_iter()
            .map(|appliance| appliance.managed_by(node.name().clone()))
            .collect();
        Ok(appliances)
    }
}
