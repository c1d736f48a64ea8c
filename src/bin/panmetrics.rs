//! Operator entry point for fleet health collection.
//!
//! Usage:
//!
//! ```text
//! panmetrics collect [--config PATH] [--output PATH] [--no-persist]
//! panmetrics ingest FILE [--config PATH]
//! panmetrics init-db [--config PATH]
//! ```
//!
//! Logging is controlled through `RUST_LOG` and defaults to
//! `panmetrics=info`. The process exits non-zero only when configuration,
//! discovery, the database connection, or the input file is unusable.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use panmetrics::collection::adapters::HttpDeviceApi;
use panmetrics::collection::domain::CollectionRecord;
use panmetrics::collection::ports::DeviceApiError;
use panmetrics::collection::services::{CollectionRunError, CollectionRunService, SessionKeyCache};
use panmetrics::config::{CollectorConfig, ConfigError, DATABASE_URL_ENV};
use panmetrics::snapshot::adapters::PostgresSnapshotRepository;
use panmetrics::snapshot::ports::SnapshotRepositoryError;
use panmetrics::snapshot::services::{BatchIngestError, BatchIngestService, SnapshotWriter};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "panmetrics=info";

#[derive(Debug, Parser)]
#[command(name = "panmetrics", version, about = "Firewall fleet health collector")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one collection cycle.
    Collect {
        /// Configuration file.
        #[arg(long)]
        config: Option<Utf8PathBuf>,
        /// Write the collected records to this file as a JSON list.
        #[arg(long)]
        output: Option<Utf8PathBuf>,
        /// Skip writing snapshots to the database.
        #[arg(long)]
        no_persist: bool,
    },
    /// Store a previously exported batch file.
    Ingest {
        /// Batch file containing a JSON list of records.
        file: Utf8PathBuf,
        /// Configuration file.
        #[arg(long)]
        config: Option<Utf8PathBuf>,
    },
    /// Create the snapshot tables when missing.
    InitDb {
        /// Configuration file.
        #[arg(long)]
        config: Option<Utf8PathBuf>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no database URL configured; set database.url or {DATABASE_URL_ENV}")]
    MissingDatabaseUrl,
    #[error(transparent)]
    Database(#[from] SnapshotRepositoryError),
    #[error("failed to build management API client: {0}")]
    Client(#[from] DeviceApiError),
    #[error(transparent)]
    Run(#[from] CollectionRunError),
    #[error(transparent)]
    Ingest(#[from] BatchIngestError),
    #[error("failed to encode records: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Output {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
    #[error("failed to start async runtime: {0}")]
    Runtime(std::io::Error),
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "panmetrics failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(command: Command) -> Result<(), CliError> {
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    match command {
        Command::Collect {
            config,
            output,
            no_persist,
        } => runtime.block_on(collect(config.as_deref(), output.as_deref(), no_persist)),
        Command::Ingest { file, config } => runtime.block_on(ingest(&file, config.as_deref())),
        Command::InitDb { config } => runtime.block_on(init_db(config.as_deref())),
    }
}

fn load_config(explicit: Option<&Utf8Path>) -> Result<CollectorConfig, CliError> {
    let (config, path) = CollectorConfig::load(explicit)?;
    info!(path = %path, "configuration loaded");
    Ok(config)
}

async fn connect_repository(
    config: &CollectorConfig,
) -> Result<Arc<PostgresSnapshotRepository>, CliError> {
    let url = config
        .database_url(std::env::var(DATABASE_URL_ENV).ok())
        .ok_or(CliError::MissingDatabaseUrl)?;
    let pool_size = config.database.pool_size;
    let repository = tokio::task::spawn_blocking(move || {
        PostgresSnapshotRepository::connect(&url, pool_size)
    })
    .await
    .map_err(SnapshotRepositoryError::persistence)??;
    repository.ensure_schema().await?;
    Ok(Arc::new(repository))
}

async fn collect(
    config_path: Option<&Utf8Path>,
    output: Option<&Utf8Path>,
    no_persist: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let nodes = config.management_nodes()?;
    let credentials = config.credentials()?;
    let api = Arc::new(HttpDeviceApi::new(config.http_settings())?);
    let service = CollectionRunService::from_parts(
        api,
        Arc::new(SessionKeyCache::new()),
        Arc::new(DefaultClock),
        config.run_settings(),
    );

    let records = if no_persist {
        service.collect_fleet(&nodes, &credentials).await?.records
    } else {
        let writer = SnapshotWriter::new(connect_repository(&config).await?);
        let report = service.run(&nodes, &credentials, &writer).await?;
        if report.persisted.failed > 0 {
            warn!(
                failed = report.persisted.failed,
                "some snapshots could not be stored"
            );
        }
        report.collection.records
    };

    if let Some(path) = output {
        write_records(path, &records)?;
    }
    Ok(())
}

fn write_records(path: &Utf8Path, records: &[CollectionRecord]) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(records)?;
    panmetrics::fs::write_string(path, &json).map_err(|source| CliError::Output {
        path: path.to_owned(),
        source,
    })?;
    info!(path = %path, records = records.len(), "records written");
    Ok(())
}

async fn ingest(file: &Utf8Path, config_path: Option<&Utf8Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let writer = SnapshotWriter::new(connect_repository(&config).await?);
    let service = BatchIngestService::new(writer, Arc::new(DefaultClock));
    let summary = service.ingest_file(file).await?;
    if summary.failed > 0 {
        warn!(failed = summary.failed, "some snapshots could not be stored");
    }
    Ok(())
}

async fn init_db(config_path: Option<&Utf8Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    connect_repository(&config).await?;
    info!("snapshot schema ready");
    Ok(())
}
