// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cluster admission whitelist

use super::connection_string::{parse_brokers, BrokerEndpoint, KafkaConnectionString};
use crate::core::error::AddressFormatError;
use std::collections::HashSet;
use std::fmt;

/// Set of broker endpoints a connector may source from
///
/// Built once when the gate is constructed and read-only afterwards. An empty
/// registry places no restriction on the source cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhitelistRegistry {
    brokers: HashSet<BrokerEndpoint>,
}

impl WhitelistRegistry {
    /// Registry that allows every cluster
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn new(brokers: impl IntoIterator<Item = BrokerEndpoint>) -> Self {
        Self {
            brokers: brokers.into_iter().collect(),
        }
    }

    /// Build from the `whiteListedClusters` setting; absent or blank means unrestricted
    pub fn from_config(raw: Option<&str>) -> Result<Self, AddressFormatError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(list) => Ok(Self::new(parse_brokers(list)?)),
            None => Ok(Self::unrestricted()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.brokers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.brokers.len()
    }

    pub fn contains(&self, broker: &BrokerEndpoint) -> bool {
        self.brokers.contains(broker)
    }

    /// True if the registry is empty or shares at least one broker with `address`
    pub fn is_allowed(&self, address: &KafkaConnectionString) -> bool {
        self.is_empty() || address.brokers().iter().any(|b| self.contains(b))
    }
}

impl fmt::Display for WhitelistRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut brokers: Vec<&BrokerEndpoint> = self.brokers.iter().collect();
        brokers.sort();
        let rendered: Vec<String> = brokers.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join(", "))
    }
}
