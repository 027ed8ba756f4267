// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Kafka Metadata Probe
//!
//! [`MetadataProbe`] backed by an `rdkafka` [`BaseConsumer`]. Each connection is a
//! dedicated consumer that only issues metadata requests; it never subscribes or
//! commits offsets.
//!
//! ## Client configuration
//!
//! ```text
//! consumer.* properties (verbatim)
//!   + bootstrap.servers = brokers of the source address
//!   + client.id         = partitionFinder            (unless configured)
//!   + security.protocol = ssl  for kafkassl://       (unless configured)
//! ```

use super::connection_string::KafkaConnectionString;
use super::metadata_probe::{MetadataConnection, MetadataProbe};
use crate::core::error::MetadataError;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer};
use std::collections::HashMap;
use std::time::Duration;

const PARTITION_FINDER_CLIENT_ID: &str = "partitionFinder";

/// Opens metadata-only Kafka consumers
#[derive(Debug, Clone)]
pub struct KafkaMetadataProbe {
    consumer_properties: HashMap<String, String>,
    timeout: Duration,
}

impl KafkaMetadataProbe {
    pub fn new(consumer_properties: HashMap<String, String>, timeout: Duration) -> Self {
        Self {
            consumer_properties,
            timeout,
        }
    }

    /// Client configuration used for a connection to `address`
    pub fn client_config(&self, address: &KafkaConnectionString) -> ClientConfig {
        let mut config = ClientConfig::new();
        for (key, value) in &self.consumer_properties {
            config.set(key, value);
        }
        config.set("bootstrap.servers", address.bootstrap_servers());
        if config.get("client.id").is_none() {
            config.set("client.id", PARTITION_FINDER_CLIENT_ID);
        }
        if address.is_secure() && config.get("security.protocol").is_none() {
            config.set("security.protocol", "ssl");
        }
        config
    }
}

impl MetadataProbe for KafkaMetadataProbe {
    fn open(
        &self,
        address: &KafkaConnectionString,
    ) -> Result<Box<dyn MetadataConnection>, MetadataError> {
        let consumer: BaseConsumer = self.client_config(address).create().map_err(|e| {
            MetadataError::connection_unavailable_with_source(
                format!(
                    "Failed to create metadata consumer for {}: {}",
                    address.bootstrap_servers(),
                    e
                ),
                Box::new(e),
            )
        })?;

        log::debug!(
            "[KafkaMetadataProbe] Opened metadata connection to {}",
            address.bootstrap_servers()
        );

        Ok(Box::new(KafkaMetadataConnection {
            consumer: Some(consumer),
            timeout: self.timeout,
        }))
    }
}

struct KafkaMetadataConnection {
    consumer: Option<BaseConsumer>,
    timeout: Duration,
}

impl MetadataConnection for KafkaMetadataConnection {
    fn partition_count(&self, topic: &str) -> Result<Option<u32>, MetadataError> {
        let consumer = self
            .consumer
            .as_ref()
            .ok_or_else(|| MetadataError::fetch(topic, "metadata connection already closed"))?;

        let metadata = consumer
            .fetch_metadata(Some(topic), self.timeout)
            .map_err(|e| {
                MetadataError::fetch_with_source(topic, e.to_string(), Box::new(e))
            })?;

        // Absent topics come back either missing or with an error code.
        let count = metadata
            .topics()
            .iter()
            .find(|t| t.name() == topic)
            .filter(|t| t.error().is_none())
            .map(|t| t.partitions().len() as u32);

        Ok(count)
    }

    fn close(&mut self) {
        if self.consumer.take().is_some() {
            log::debug!("[KafkaMetadataProbe] Closed metadata connection");
        }
    }
}
