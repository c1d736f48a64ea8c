//! Batch ingestion documents.
//!
//! A document is either a JSON list of record objects or an object whose
//! `devices` member is such a list. Each object has the collection record
//! shape.

use super::BatchFormatError;
use super::coercion::{coerce_bool, coerce_f64, coerce_string, coerce_u64};
use crate::collection::domain::{
    CertificateState, CollectionRecord, DiskUsage, TimezonePolicy, YesNo, normalize_timestamp,
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// A parsed batch ingestion document.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchDocument {
    records: Vec<BatchRecord>,
}

impl BatchDocument {
    /// Parses a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`BatchFormatError`] for invalid JSON or an unexpected shape.
    pub fn parse(json: &str) -> Result<Self, BatchFormatError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|err| BatchFormatError::InvalidJson(err.to_string()))?;
        Self::from_value(value)
    }

    /// Interprets an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`BatchFormatError::UnexpectedShape`] unless the value is a
    /// list or an object with a `devices` list, and
    /// [`BatchFormatError::NonObjectRecord`] for non-object items.
    pub fn from_value(value: Value) -> Result<Self, BatchFormatError> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut object) => match object.remove("devices") {
                Some(Value::Array(items)) => items,
                _ => return Err(BatchFormatError::UnexpectedShape),
            },
            _ => return Err(BatchFormatError::UnexpectedShape),
        };
        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(fields) => Ok(BatchRecord(fields)),
                _ => Err(BatchFormatError::NonObjectRecord { index }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the document holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Converts every record, stamping missing timestamps with `now`.
    #[must_use]
    pub fn into_collection_records(self, now: DateTime<Utc>) -> Vec<CollectionRecord> {
        self.records
            .into_iter()
            .map(|record| record.into_collection_record(now))
            .collect()
    }
}

/// One loosely typed record object from a batch document.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRecord(Map<String, Value>);

impl BatchRecord {
    /// Wraps a JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Converts to a collection record.
    ///
    /// `timestamp` is read as UTC wall-clock time and falls back to `now`
    /// when missing or unparseable. Numeric fields that do not coerce are
    /// left unset.
    #[must_use]
    pub fn into_collection_record(self, now: DateTime<Utc>) -> CollectionRecord {
        let collected_at = self
            .string("timestamp")
            .and_then(|raw| normalize_timestamp(&raw, TimezonePolicy::KnownUtc))
            .map_or(now, |normalized| normalized.instant());
        let expiry = self
            .string("device_cert_exp")
            .and_then(|raw| normalize_timestamp(&raw, TimezonePolicy::Detect));

        let mut record = CollectionRecord::empty(collected_at);
        record.hostname = self.string("hostname");
        record.serial = self.string("serial");
        record.address = self.string("ip");
        record.management_node = self.string("panorama");
        record.connected = self.string("connected");
        record.ha_state = self.string("ha_state");
        record.software_version = self.string("pan_os_version");
        record.model = self.string("model");
        record.cpu_one_min = self.field(coerce_f64, "cpu_one_min");
        record.memory_usage = self.field(coerce_f64, "memory_usage");
        record.swap_used = self.field(coerce_f64, "swap_used");
        record.session_count = self.field(coerce_u64, "session_count");
        record.session_max = self.field(coerce_u64, "session_max");
        record.logging_service = self
            .string("logging_service")
            .map_or(YesNo::No, |flag| YesNo::from_flag(&flag));
        record.certificate = self
            .string("device_certificate")
            .map_or(CertificateState::Missing, |flag| CertificateState::from_flag(&flag));
        record.certificate_expires_at = expiry.map(|normalized| normalized.instant());
        record.cert_timezone_assumed = self
            .field(coerce_bool, "cert_timezone_assumed")
            .unwrap_or(false)
            || expiry.is_some_and(|normalized| normalized.timezone_assumed());
        record.disks = self.disks();
        record
    }

    fn string(&self, name: &str) -> Option<String> {
        self.field(coerce_string, name)
    }

    fn field<T>(&self, coerce: fn(&Value) -> Option<T>, name: &str) -> Option<T> {
        self.0.get(name).and_then(coerce)
    }

    fn disks(&self) -> DiskUsage {
        self.0
            .iter()
            .filter(|(key, _)| DiskUsage::is_disk_key(key))
            .filter_map(|(key, value)| coerce_f64(value).map(|percent| (key.clone(), percent)))
            .collect()
    }
}
