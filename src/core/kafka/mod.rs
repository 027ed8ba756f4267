// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod connection_string;
#[cfg(feature = "kafka")]
pub mod kafka_probe;
pub mod metadata_probe;
pub mod whitelist;
pub mod wildcard;

pub use connection_string::{parse_brokers, BrokerEndpoint, KafkaConnectionString};
#[cfg(feature = "kafka")]
pub use kafka_probe::KafkaMetadataProbe;
pub use metadata_probe::{with_connection, MetadataConnection, MetadataProbe, StaticMetadataProbe};
pub use whitelist::WhitelistRegistry;
pub use wildcard::has_wildcard;
