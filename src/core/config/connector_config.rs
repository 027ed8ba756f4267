// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Connector Configuration
//!
//! Settings consumed by the source-validation gate.
//!
//! ## Keys
//!
//! | Key | Meaning | Default |
//! |---|---|---|
//! | `whiteListedClusters` | comma-separated `host:port` list; empty means unrestricted | unset |
//! | `defaultKeySerde` | key serde assigned to destinations lacking one | unset |
//! | `defaultValueSerde` | value serde assigned to destinations lacking one | unset |
//! | `metadataTimeoutMs` | timeout handed to the Kafka client for metadata requests | 30000 |
//! | `consumer.*` | passed verbatim to the metadata consumer | none |
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use std::collections::HashMap;
//!
//! let mut properties = HashMap::new();
//! properties.insert("whiteListedClusters".to_string(), "b1:9092".to_string());
//! properties.insert("consumer.security.protocol".to_string(), "ssl".to_string());
//!
//! let config = ConnectorConfig::from_properties(&properties)?;
//! ```
//!
//! The same settings can be loaded from a TOML or YAML file, where the consumer
//! properties live in a `consumer` table.

use crate::core::error::AddressFormatError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_WHITE_LISTED_CLUSTERS: &str = "whiteListedClusters";
pub const CONFIG_DEFAULT_KEY_SERDE: &str = "defaultKeySerde";
pub const CONFIG_DEFAULT_VALUE_SERDE: &str = "defaultValueSerde";
pub const CONFIG_METADATA_TIMEOUT_MS: &str = "metadataTimeoutMs";
pub const CONFIG_CONSUMER_PREFIX: &str = "consumer.";

const DEFAULT_METADATA_TIMEOUT_MS: u64 = 30_000;

/// Errors raised while loading connector configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported config file format: {path} (expected .toml, .yaml or .yml)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Invalid whiteListedClusters: {0}")]
    Whitelist(#[from] AddressFormatError),
}

fn default_metadata_timeout_ms() -> u64 {
    DEFAULT_METADATA_TIMEOUT_MS
}

/// Configuration of a Kafka source connector
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorConfig {
    #[serde(default)]
    pub white_listed_clusters: Option<String>,
    #[serde(default)]
    pub default_key_serde: Option<String>,
    #[serde(default)]
    pub default_value_serde: Option<String>,
    #[serde(default = "default_metadata_timeout_ms")]
    pub metadata_timeout_ms: u64,
    /// Client properties for metadata connections
    #[serde(default)]
    pub consumer: HashMap<String, String>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            white_listed_clusters: None,
            default_key_serde: None,
            default_value_serde: None,
            metadata_timeout_ms: DEFAULT_METADATA_TIMEOUT_MS,
            consumer: HashMap::new(),
        }
    }
}

impl ConnectorConfig {
    /// Parse configuration from a flat properties map
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(clusters) = properties.get(CONFIG_WHITE_LISTED_CLUSTERS) {
            config.white_listed_clusters = Some(clusters.clone());
        }

        if let Some(serde) = properties.get(CONFIG_DEFAULT_KEY_SERDE) {
            config.default_key_serde = Some(serde.clone());
        }

        if let Some(serde) = properties.get(CONFIG_DEFAULT_VALUE_SERDE) {
            config.default_value_serde = Some(serde.clone());
        }

        if let Some(timeout) = properties.get(CONFIG_METADATA_TIMEOUT_MS) {
            config.metadata_timeout_ms =
                timeout.trim().parse().map_err(|e| ConfigError::InvalidValue {
                    key: CONFIG_METADATA_TIMEOUT_MS.to_string(),
                    message: format!("{}", e),
                })?;
        }

        config.consumer = properties
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(CONFIG_CONSUMER_PREFIX)
                    .filter(|k| !k.is_empty())
                    .map(|k| (k.to_string(), value.clone()))
            })
            .collect();

        Ok(config)
    }

    /// Load configuration from a `.toml`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Default key serde, ignoring blank values
    pub fn default_key_serde(&self) -> Option<&str> {
        non_blank(self.default_key_serde.as_deref())
    }

    /// Default value serde, ignoring blank values
    pub fn default_value_serde(&self) -> Option<&str> {
        non_blank(self.default_value_serde.as_deref())
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_millis(self.metadata_timeout_ms)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
