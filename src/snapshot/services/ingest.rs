//! Batch ingestion of collection records from JSON files.

use super::writer::{PersistSummary, SnapshotWriter};
use crate::snapshot::{
    domain::{BatchDocument, BatchFormatError},
    ports::SnapshotRepository,
};
use camino::{Utf8Path, Utf8PathBuf};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

/// Errors returned by batch ingestion.
#[derive(Debug, Clone, Error)]
pub enum BatchIngestError {
    /// The file could not be read.
    #[error("failed to read batch file {path}: {source}")]
    Read {
        /// File path.
        path: Utf8PathBuf,
        /// I/O failure.
        source: Arc<std::io::Error>,
    },
    /// The file content is not a batch document.
    #[error(transparent)]
    Format(#[from] BatchFormatError),
}

/// Persists batch ingestion documents.
pub struct BatchIngestService<R, C>
where
    R: SnapshotRepository,
    C: Clock + Send + Sync,
{
    writer: SnapshotWriter<R>,
    clock: Arc<C>,
}

impl<R, C> BatchIngestService<R, C>
where
    R: SnapshotRepository,
    C: Clock + Send + Sync,
{
    /// Creates an ingestion service.
    #[must_use]
    pub const fn new(writer: SnapshotWriter<R>, clock: Arc<C>) -> Self {
        Self { writer, clock }
    }

    /// Persists every record of `document`.
    pub async fn ingest_document(&self, document: BatchDocument) -> PersistSummary {
        let records = document.into_collection_records(self.clock.utc());
        self.writer.persist(&records).await
    }

    /// Parses and persists JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`BatchIngestError::Format`] when the text is not a batch
    /// document.
    pub async fn ingest_json(&self, json: &str) -> Result<PersistSummary, BatchIngestError> {
        let document = BatchDocument::parse(json)?;
        Ok(self.ingest_document(document).await)
    }

    /// Reads, parses, and persists a batch file.
    ///
    /// # Errors
    ///
    /// Returns [`BatchIngestError::Read`] when the file cannot be read and
    /// [`BatchIngestError::Format`] when its content is not a batch
    /// document.
    #[instrument(skip(self))]
    pub async fn ingest_file(&self, path: &Utf8Path) -> Result<PersistSummary, BatchIngestError> {
        let json = crate::fs::read_to_string(path).map_err(|err| BatchIngestError::Read {
            path: path.to_owned(),
            source: Arc::new(err),
        })?;
        let summary = self.ingest_json(&json).await?;
        info!(path = %path, inserted = summary.inserted, "batch file ingested");
        Ok(summary)
    }
}
