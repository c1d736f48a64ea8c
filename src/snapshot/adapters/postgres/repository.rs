//! `PostgreSQL` repository implementation for appliance and snapshot storage.

use super::{
    models::{ApplianceChangeset, ApplianceRow, NewApplianceRow, NewSnapshotRow, SnapshotRow},
    schema::{appliances, metric_snapshots},
};
use crate::collection::domain::{CertificateState, DiskUsage, YesNo};
use crate::snapshot::{
    domain::{
        Appliance, ApplianceId, PersistedApplianceData, PersistedSnapshotData, Snapshot,
        SnapshotId, SnapshotMetrics, StoreOutcome,
    },
    ports::{SnapshotRepository, SnapshotRepositoryError, SnapshotRepositoryResult},
};
use async_trait::async_trait;
use chrono::Utc;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use serde_json::Value;

/// `PostgreSQL` connection pool type used by snapshot adapters.
pub type SnapshotPgPool = Pool<ConnectionManager<PgConnection>>;

const SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_appliances_and_snapshots/up.sql");

const SNAPSHOT_UNIQUE_CONSTRAINT: &str = "metric_snapshots_appliance_collected_unique";

/// `PostgreSQL`-backed snapshot repository.
#[derive(Debug, Clone)]
pub struct PostgresSnapshotRepository {
    pool: SnapshotPgPool,
}

enum StoreFailure {
    Duplicate,
    Database(DieselError),
}

impl From<DieselError> for StoreFailure {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                if is_snapshot_unique_violation(info.as_ref()) =>
            {
                Self::Duplicate
            }
            other => Self::Database(other),
        }
    }
}

impl PostgresSnapshotRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: SnapshotPgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool for `database_url` and wraps it.
    ///
    /// Blocks until the pool has established its initial connections.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotRepositoryError::Persistence`] when the pool cannot
    /// connect.
    pub fn connect(database_url: &str, pool_size: u32) -> SnapshotRepositoryResult<Self> {
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(ConnectionManager::<PgConnection>::new(database_url))
            .map_err(SnapshotRepositoryError::persistence)?;
        Ok(Self::new(pool))
    }

    /// Creates the tables and indexes when they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotRepositoryError::Persistence`] when a statement
    /// fails.
    pub async fn ensure_schema(&self) -> SnapshotRepositoryResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(SCHEMA_SQL)
                .map_err(SnapshotRepositoryError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> SnapshotRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> SnapshotRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(SnapshotRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(SnapshotRepositoryError::persistence)?
    }
}

#[async_trait]
impl SnapshotRepository for PostgresSnapshotRepository {
    async fn store(
        &self,
        appliance: &Appliance,
        snapshot: &Snapshot,
    ) -> SnapshotRepositoryResult<StoreOutcome> {
        let (new_appliance, changeset) = to_appliance_rows(appliance);
        let new_snapshot = to_new_snapshot_row(snapshot)?;

        self.run_blocking(move |connection| {
            let result = connection.transaction::<_, StoreFailure, _>(|transaction| {
                diesel::insert_into(appliances::table)
                    .values(&new_appliance)
                    .on_conflict(appliances::serial)
                    .do_update()
                    .set(&changeset)
                    .execute(transaction)?;

                let inserted = diesel::insert_into(metric_snapshots::table)
                    .values(&new_snapshot)
                    .on_conflict((metric_snapshots::appliance_id, metric_snapshots::collected_at))
                    .do_nothing()
                    .execute(transaction)?;
                if inserted == 0 {
                    return Err(StoreFailure::Duplicate);
                }
                Ok(())
            });

            match result {
                Ok(()) => Ok(StoreOutcome::Inserted),
                Err(StoreFailure::Duplicate) => Ok(StoreOutcome::DuplicateIgnored),
                Err(StoreFailure::Database(err)) => Err(SnapshotRepositoryError::persistence(err)),
            }
        })
        .await
    }

    async fn find_appliance(&self, id: &ApplianceId) -> SnapshotRepositoryResult<Option<Appliance>> {
        let serial = id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = appliances::table
                .filter(appliances::serial.eq(serial.as_str()))
                .select(ApplianceRow::as_select())
                .first::<ApplianceRow>(connection)
                .optional()
                .map_err(SnapshotRepositoryError::persistence)?;
            row.map(row_to_appliance).transpose()
        })
        .await
    }

    async fn snapshots_for(&self, id: &ApplianceId) -> SnapshotRepositoryResult<Vec<Snapshot>> {
        let serial = id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = metric_snapshots::table
                .filter(metric_snapshots::appliance_id.eq(serial.as_str()))
                .order(metric_snapshots::collected_at.asc())
                .select(SnapshotRow::as_select())
                .load::<SnapshotRow>(connection)
                .map_err(SnapshotRepositoryError::persistence)?;
            rows.into_iter().map(row_to_snapshot).collect()
        })
        .await
    }
}

fn to_appliance_rows(appliance: &Appliance) -> (NewApplianceRow, ApplianceChangeset) {
    let updated_at = Utc::now();
    let new_row = NewApplianceRow {
        serial: appliance.id().as_str().to_owned(),
        hostname: appliance.display_name().to_owned(),
        address: appliance.address().map(ToOwned::to_owned),
        management_node: appliance.management_node().map(ToOwned::to_owned),
        model: appliance.model().map(ToOwned::to_owned),
        software_version: appliance.software_version().map(ToOwned::to_owned),
        updated_at,
    };
    let changeset = ApplianceChangeset {
        hostname: appliance.hostname().map(ToOwned::to_owned),
        address: new_row.address.clone(),
        management_node: new_row.management_node.clone(),
        model: new_row.model.clone(),
        software_version: new_row.software_version.clone(),
        updated_at,
    };
    (new_row, changeset)
}

fn to_new_snapshot_row(snapshot: &Snapshot) -> SnapshotRepositoryResult<NewSnapshotRow> {
    let metrics = snapshot.metrics();
    let disk_usage =
        serde_json::to_value(&metrics.disks).map_err(SnapshotRepositoryError::persistence)?;
    Ok(NewSnapshotRow {
        id: snapshot.id().into_inner(),
        appliance_id: snapshot.appliance_id().as_str().to_owned(),
        collected_at: snapshot.collected_at(),
        connected: metrics.connected.clone(),
        ha_state: metrics.ha_state.clone(),
        cpu_one_min: metrics.cpu_one_min,
        memory_usage: metrics.memory_usage,
        swap_used: metrics.swap_used,
        session_count: to_column_count(metrics.session_count)?,
        session_max: to_column_count(metrics.session_max)?,
        logging_service: metrics.logging_service.as_str().to_owned(),
        device_certificate: metrics.certificate.as_str().to_owned(),
        device_cert_exp: metrics.certificate_expires_at,
        cert_timezone_assumed: metrics.cert_timezone_assumed,
        disk_usage,
    })
}

fn to_column_count(count: Option<u64>) -> SnapshotRepositoryResult<Option<i64>> {
    count
        .map(i64::try_from)
        .transpose()
        .map_err(SnapshotRepositoryError::persistence)
}

fn from_column_count(count: Option<i64>) -> SnapshotRepositoryResult<Option<u64>> {
    count
        .map(u64::try_from)
        .transpose()
        .map_err(|err| SnapshotRepositoryError::InvalidPersistedData(err.to_string()))
}

fn row_to_appliance(row: ApplianceRow) -> SnapshotRepositoryResult<Appliance> {
    let ApplianceRow {
        serial,
        hostname,
        address,
        management_node,
        model,
        software_version,
    } = row;
    let id = ApplianceId::new(serial)
        .map_err(|err| SnapshotRepositoryError::InvalidPersistedData(err.to_string()))?;
    Ok(Appliance::from_persisted(PersistedApplianceData {
        id,
        hostname: Some(hostname),
        address,
        management_node,
        model,
        software_version,
    }))
}

fn row_to_snapshot(row: SnapshotRow) -> SnapshotRepositoryResult<Snapshot> {
    let SnapshotRow {
        id,
        appliance_id,
        collected_at,
        connected,
        ha_state,
        cpu_one_min,
        memory_usage,
        swap_used,
        session_count,
        session_max,
        logging_service,
        device_certificate,
        device_cert_exp,
        cert_timezone_assumed,
        disk_usage,
    } = row;

    let appliance_id = ApplianceId::new(appliance_id)
        .map_err(|err| SnapshotRepositoryError::InvalidPersistedData(err.to_string()))?;
    let metrics = SnapshotMetrics {
        connected,
        ha_state,
        cpu_one_min,
        memory_usage,
        swap_used,
        session_count: from_column_count(session_count)?,
        session_max: from_column_count(session_max)?,
        logging_service: YesNo::from_flag(&logging_service),
        certificate: CertificateState::from_flag(&device_certificate),
        certificate_expires_at: device_cert_exp,
        cert_timezone_assumed,
        disks: disks_from_column(disk_usage)?,
    };
    Ok(Snapshot::from_persisted(PersistedSnapshotData {
        id: SnapshotId::from_uuid(id),
        appliance_id,
        collected_at,
        metrics,
    }))
}

fn disks_from_column(value: Value) -> SnapshotRepositoryResult<DiskUsage> {
    let Value::Object(entries) = value else {
        return Err(SnapshotRepositoryError::InvalidPersistedData(String::from(
            "disk_usage is not a JSON object",
        )));
    };
    entries
        .into_iter()
        .map(|(key, percent)| {
            percent.as_f64().map(|number| (key.clone(), number)).ok_or_else(|| {
                SnapshotRepositoryError::InvalidPersistedData(format!(
                    "disk_usage entry {key} is not a number"
                ))
            })
        })
        .collect()
}

fn is_snapshot_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == SNAPSHOT_UNIQUE_CONSTRAINT)
}
