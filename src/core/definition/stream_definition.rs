// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata key holding the requested per-partition start offsets as JSON
pub const START_POSITION: &str = "start-position";

/// Where a stream reads from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpec {
    pub connection_string: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partitions: Option<u32>,
}

/// Where a stream writes to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationSpec {
    #[serde(default)]
    pub connection_string: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_serde: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_serde: Option<String>,
}

/// A request to move data from a source to a destination
///
/// Owned by the caller. Validation rewrites `source` in place once the definition is
/// admitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDefinition {
    pub name: String,
    pub source: SourceSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<DestinationSpec>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl StreamDefinition {
    pub fn new(name: impl Into<String>, connection_string: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: SourceSpec {
                connection_string: connection_string.into(),
                partitions: None,
            },
            destination: None,
            metadata: HashMap::new(),
        }
    }

    /// Builder: declare the expected partition count
    pub fn partitions(mut self, partitions: u32) -> Self {
        self.source.partitions = Some(partitions);
        self
    }

    /// Builder: attach a destination
    pub fn destination(mut self, destination: DestinationSpec) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Builder: set a metadata entry
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn start_position(&self) -> Option<&str> {
        self.metadata.get(START_POSITION).map(String::as_str)
    }
}
