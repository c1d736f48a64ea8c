//! Collector configuration.
//!
//! Configuration is a YAML file located through an explicit path, the
//! `CONFIG_PATH` environment variable, or `./config.yaml`, in that order.
//!
//! ```yaml
//! management_nodes:          # alias: panoramas
//!   - name: east
//!     address: 10.0.0.10     # alias: ip
//! credentials:
//!   username: api-reader
//!   password: secret
//! collection:
//!   concurrency: 8
//!   request_timeout_secs: 10
//!   run_deadline_secs: 300
//!   verify_tls: false
//!   scheme: https
//! database:
//!   url: postgres://localhost/panmetrics
//!   pool_size: 4
//! ```

use crate::collection::adapters::{ApiScheme, HttpDeviceApiSettings};
use crate::collection::domain::{
    ApplianceAddress, CollectionDomainError, Credentials, ManagementNode, ManagementNodeName,
};
use crate::collection::services::RunSettings;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Environment variable supplying the database URL when the file omits it.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Errors raised while locating, reading, or validating configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// None of the candidate paths names a file.
    #[error("configuration file not found; tried: {}", join_paths(.tried))]
    NotFound {
        /// Every path checked, in order.
        tried: Vec<Utf8PathBuf>,
    },

    /// The file exists but could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        /// File path.
        path: Utf8PathBuf,
        /// I/O failure.
        source: Arc<std::io::Error>,
    },

    /// The file is not valid YAML for this schema.
    #[error("invalid configuration: {0}")]
    Parse(String),

    /// A value failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<CollectionDomainError> for ConfigError {
    fn from(err: CollectionDomainError) -> Self {
        Self::Invalid(err.to_string())
    }
}

fn join_paths(paths: &[Utf8PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Top-level collector configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectorConfig {
    /// Management nodes queried for inventory.
    #[serde(alias = "panoramas")]
    pub management_nodes: Vec<ManagementNodeConfig>,
    /// Credentials shared by management nodes and appliances.
    pub credentials: CredentialsConfig,
    /// Collection tuning.
    #[serde(default)]
    pub collection: CollectionSettings,
    /// Snapshot database.
    #[serde(default)]
    pub database: DatabaseSettings,
}

/// One configured management node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManagementNodeConfig {
    /// Logical name used to tag discovered appliances.
    pub name: String,
    /// Host name or IP address.
    #[serde(alias = "ip")]
    pub address: String,
}

/// API credentials.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialsConfig {
    /// Username.
    pub username: String,
    /// Password.
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Collection tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CollectionSettings {
    /// Maximum appliances collected at once.
    pub concurrency: usize,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Budget for one collection cycle in seconds; `0` disables it.
    pub run_deadline_secs: u64,
    /// Whether appliance certificates are verified.
    pub verify_tls: bool,
    /// URL scheme for the management API.
    pub scheme: ApiScheme,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            concurrency: 8,
            request_timeout_secs: 10,
            run_deadline_secs: 300,
            verify_tls: false,
            scheme: ApiScheme::Https,
        }
    }
}

/// Snapshot database settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Connection URL; falls back to `DATABASE_URL`.
    pub url: Option<String>,
    /// Connection pool size.
    pub pool_size: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: 4,
        }
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DatabaseSettings")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

/// Returns the configuration paths to try, in order.
///
/// An explicit path is the only candidate when given, so a mistyped
/// `--config` never falls through to another file.
#[must_use]
pub fn candidate_paths(explicit: Option<&Utf8Path>, env_value: Option<&str>) -> Vec<Utf8PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_owned()];
    }
    env_value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Utf8PathBuf::from)
        .into_iter()
        .chain(std::iter::once(Utf8PathBuf::from(DEFAULT_CONFIG_FILE)))
        .collect()
}

impl CollectorConfig {
    /// Locates and loads the configuration, consulting `CONFIG_PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no file is found or the first file found
    /// is unreadable or invalid.
    pub fn load(explicit: Option<&Utf8Path>) -> Result<(Self, Utf8PathBuf), ConfigError> {
        let env_value = std::env::var(CONFIG_PATH_ENV).ok();
        Self::load_first(&candidate_paths(explicit, env_value.as_deref()))
    }

    /// Loads the first candidate that names a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when no candidate exists, otherwise
    /// the read or validation error for the chosen file.
    pub fn load_first(candidates: &[Utf8PathBuf]) -> Result<(Self, Utf8PathBuf), ConfigError> {
        let path = candidates
            .iter()
            .find(|candidate| crate::fs::is_file(candidate))
            .ok_or_else(|| ConfigError::NotFound {
                tried: candidates.to_vec(),
            })?;
        let text = crate::fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.clone(),
            source: Arc::new(err),
        })?;
        Ok((Self::from_yaml(&text)?, path.clone()))
    }

    /// Parses and validates YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.management_nodes.is_empty() {
            return Err(ConfigError::Invalid(String::from(
                "at least one management node is required",
            )));
        }
        let nodes = self.management_nodes()?;
        let mut seen = HashSet::new();
        if let Some(duplicate) = nodes.iter().find(|node| !seen.insert(node.name().clone())) {
            return Err(ConfigError::Invalid(format!(
                "management node name '{}' is used more than once",
                duplicate.name()
            )));
        }
        self.credentials()?;
        if self.collection.concurrency == 0 {
            return Err(ConfigError::Invalid(String::from(
                "collection.concurrency must be at least 1",
            )));
        }
        if self.collection.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(String::from(
                "collection.request_timeout_secs must be at least 1",
            )));
        }
        Ok(())
    }

    /// Returns the management nodes as domain values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for blank names or malformed
    /// addresses.
    pub fn management_nodes(&self) -> Result<Vec<ManagementNode>, ConfigError> {
        self.management_nodes
            .iter()
            .map(|node| -> Result<ManagementNode, ConfigError> {
                Ok(ManagementNode::new(
                    ManagementNodeName::new(node.name.as_str())?,
                    ApplianceAddress::new(node.address.as_str())?,
                ))
            })
            .collect()
    }

    /// Returns the credentials as a domain value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a blank username.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        Ok(Credentials::new(
            self.credentials.username.as_str(),
            self.credentials.password.as_str(),
        )?)
    }

    /// Returns transport settings for the HTTP adapter.
    #[must_use]
    pub const fn http_settings(&self) -> HttpDeviceApiSettings {
        HttpDeviceApiSettings {
            scheme: self.collection.scheme,
            request_timeout: Duration::from_secs(self.collection.request_timeout_secs),
            verify_tls: self.collection.verify_tls,
        }
    }

    /// Returns concurrency and deadline settings for a run.
    #[must_use]
    pub const fn run_settings(&self) -> RunSettings {
        let deadline = if self.collection.run_deadline_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.collection.run_deadline_secs))
        };
        RunSettings {
            concurrency: self.collection.concurrency,
            deadline,
        }
    }

    /// Returns the database URL from the file, else from `env_value`.
    #[must_use]
    pub fn database_url(&self, env_value: Option<String>) -> Option<String> {
        self.database
            .url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| env_value.filter(|url| !url.trim().is_empty()))
    }
}
