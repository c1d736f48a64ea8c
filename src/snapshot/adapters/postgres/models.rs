//! Diesel row models for appliance and snapshot persistence.

use super::schema::{appliances, metric_snapshots};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for appliances.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = appliances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApplianceRow {
    /// Appliance identifier.
    pub serial: String,
    /// Host name.
    pub hostname: String,
    /// Management address.
    pub address: Option<String>,
    /// Reporting management node.
    pub management_node: Option<String>,
    /// Hardware model.
    pub model: Option<String>,
    /// Software version.
    pub software_version: Option<String>,
}

/// Insert model for appliances.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = appliances)]
pub struct NewApplianceRow {
    /// Appliance identifier.
    pub serial: String,
    /// Host name, or the identifier when none is known.
    pub hostname: String,
    /// Management address.
    pub address: Option<String>,
    /// Reporting management node.
    pub management_node: Option<String>,
    /// Hardware model.
    pub model: Option<String>,
    /// Software version.
    pub software_version: Option<String>,
    /// Upsert timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Conflict update for appliances; `None` fields keep the stored value.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = appliances)]
pub struct ApplianceChangeset {
    /// Host name.
    pub hostname: Option<String>,
    /// Management address.
    pub address: Option<String>,
    /// Reporting management node.
    pub management_node: Option<String>,
    /// Hardware model.
    pub model: Option<String>,
    /// Software version.
    pub software_version: Option<String>,
    /// Upsert timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for snapshots.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = metric_snapshots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SnapshotRow {
    /// Snapshot identifier.
    pub id: uuid::Uuid,
    /// Owning appliance.
    pub appliance_id: String,
    /// Collection instant.
    pub collected_at: DateTime<Utc>,
    /// Connectivity flag.
    pub connected: Option<String>,
    /// High-availability state.
    pub ha_state: Option<String>,
    /// One-minute load average.
    pub cpu_one_min: Option<f64>,
    /// Memory utilization percentage.
    pub memory_usage: Option<f64>,
    /// Swap in use.
    pub swap_used: Option<f64>,
    /// Active sessions.
    pub session_count: Option<i64>,
    /// Session capacity.
    pub session_max: Option<i64>,
    /// Logging-service connectivity.
    pub logging_service: String,
    /// Certificate presence.
    pub device_certificate: String,
    /// Certificate expiry.
    pub device_cert_exp: Option<DateTime<Utc>>,
    /// Expiry zone was assumed.
    pub cert_timezone_assumed: bool,
    /// Disk utilization object.
    pub disk_usage: Value,
}

/// Insert model for snapshots.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = metric_snapshots)]
pub struct NewSnapshotRow {
    /// Snapshot identifier.
    pub id: uuid::Uuid,
    /// Owning appliance.
    pub appliance_id: String,
    /// Collection instant.
    pub collected_at: DateTime<Utc>,
    /// Connectivity flag.
    pub connected: Option<String>,
    /// High-availability state.
    pub ha_state: Option<String>,
    /// One-minute load average.
    pub cpu_one_min: Option<f64>,
    /// Memory utilization percentage.
    pub memory_usage: Option<f64>,
    /// Swap in use.
    pub swap_used: Option<f64>,
    /// Active sessions.
    pub session_count: Option<i64>,
    /// Session capacity.
    pub session_max: Option<i64>,
    /// Logging-service connectivity.
    pub logging_service: String,
    /// Certificate presence.
    pub device_certificate: String,
    /// Certificate expiry.
    pub device_cert_exp: Option<DateTime<Utc>>,
    /// Expiry zone was assumed.
    pub cert_timezone_assumed: bool,
    /// Disk utilization object.
    pub disk_usage: Value,
}
