//! Operational commands issued against the management API.

use std::fmt;

/// An operational command understood by management nodes and appliances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationalCommand {
    /// Lists appliances currently connected to a management node.
    ShowConnectedDevices,
    /// Session table utilization.
    ShowSessionInfo,
    /// Software version and model.
    ShowSystemInfo,
    /// `top`-style resource usage text.
    ShowSystemResources,
    /// `df`-style disk usage text.
    ShowDiskSpace,
    /// Logging-service forwarding connectivity.
    LoggingServiceStatus,
    /// Device certificate validity.
    ShowDeviceCertificateStatus,
}

impl OperationalCommand {
    /// Returns the XML command document sent in the `cmd` query parameter.
    #[must_use]
    pub const fn as_xml(self) -> &'static str {
        match self {
            Self::ShowConnectedDevices => "<show><devices><connected></connected></devices></show>",
            Self::ShowSessionInfo => "<show><session><info></info></session></show>",
            Self::ShowSystemInfo => "<show><system><info></info></system></show>",
            Self::ShowSystemResources => "<show><system><resources></resources></system></show>",
            Self::ShowDiskSpace => {
                "<show><system><disk-space><files></files></disk-space></system></show>"
            }
            Self::LoggingServiceStatus => {
                "<request><logging-service-forwarding><status></status></logging-service-forwarding></request>"
            }
            Self::ShowDeviceCertificateStatus => {
                "<show><device-certificate><status></status></device-certificate></show>"
            }
        }
    }

    /// Returns a short label for log fields.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ShowConnectedDevices => "connected-devices",
            Self::ShowSessionInfo => "session",
            Self::ShowSystemInfo => "system-info",
            Self::ShowSystemResources => "resources",
            Self::ShowDiskSpace => "disk-space",
            Self::LoggingServiceStatus => "logging-service",
            Self::ShowDeviceCertificateStatus => "device-certificate",
        }
    }
}

impl fmt::Display for OperationalCommand {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// One of the six per-appliance metric queries, in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Active sessions and session capacity.
    Session,
    /// Software version and model.
    SystemIdentity,
    /// CPU load, memory and swap.
    Resources,
    /// Per-mount disk utilization.
    DiskUsage,
    /// Logging-service connectivity.
    LoggingService,
    /// Device certificate validity and expiry.
    Certificate,
}

impl MetricKind {
    /// Every metric in the order the collector issues them.
    pub const ALL: [Self; 6] = [
        Self::Session,
        Self::SystemIdentity,
        Self::Resources,
        Self::DiskUsage,
        Self::LoggingService,
        Self::Certificate,
    ];

    /// Returns the command that retrieves this metric.
    #[must_use]
    pub const fn command(self) -> OperationalCommand {
        match self {
            Self::Session => OperationalCommand::ShowSessionInfo,
            Self::SystemIdentity => OperationalCommand::ShowSystemInfo,
            Self::Resources => OperationalCommand::ShowSystemResources,
            Self::DiskUsage => OperationalCommand::ShowDiskSpace,
            Self::LoggingService => OperationalCommand::LoggingServiceStatus,
            Self::Certificate => OperationalCommand::ShowDeviceCertificateStatus,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.command().label())
    }
}
