// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Kafka Connection Strings
//!
//! Parses source addresses of the form
//!
//! ```text
//! kafka://host1:9092,host2:9092/topic
//! kafkassl://host1:9093/topic
//! kafka://[::1]:9092/topic
//! ```
//!
//! IPv6 hosts must be bracketed; the port is split off at the last `:`.
//!
//! into a [`KafkaConnectionString`] whose broker list is kept in canonical order
//! (host, then port). Rendering the parsed value yields the canonical address, and
//! parsing the canonical address yields the same value again.

use crate::core::error::AddressFormatError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

pub const SCHEME_KAFKA: &str = "kafka://";
pub const SCHEME_KAFKA_SSL: &str = "kafkassl://";

static HOST_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9._-]+|\[[0-9A-Fa-f:.]+\])$").expect("host pattern is valid")
});

/// One broker node of a Kafka cluster
///
/// Equality, hashing and ordering are structural over `(host, port)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BrokerEndpoint {
    pub host: String,
    pub port: u16,
}

impl BrokerEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse a single `host:port` entry
    ///
    /// `address` is the full text being parsed and is only used for error reporting.
    fn parse(raw: &str, address: &str) -> Result<Self, AddressFormatError> {
        let broker = raw.trim();
        let malformed = |reason: &str| AddressFormatError::MalformedBroker {
            address: address.to_string(),
            broker: broker.to_string(),
            reason: reason.to_string(),
        };

        if broker.is_empty() {
            return Err(malformed("empty broker entry"));
        }

        let (host, port) = broker
            .rsplit_once(':')
            .ok_or_else(|| malformed("expected host:port"))?;
        let host = host.trim();
        let port = port.trim();

        if !HOST_REGEX.is_match(host) {
            return Err(malformed("invalid host name"));
        }
        let port = port
            .parse::<u16>()
            .map_err(|e| malformed(&format!("invalid port '{}': {}", port, e)))?;

        Ok(Self::new(host, port))
    }
}

impl fmt::Display for BrokerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Parse a bare comma-separated broker list such as `b1:9092,b2:9092`
///
/// The returned list is sorted in canonical order.
pub fn parse_brokers(raw: &str) -> Result<Vec<BrokerEndpoint>, AddressFormatError> {
    parse_broker_section(raw, raw)
}

fn parse_broker_section(
    section: &str,
    address: &str,
) -> Result<Vec<BrokerEndpoint>, AddressFormatError> {
    if section.trim().is_empty() {
        return Err(AddressFormatError::EmptyBrokerList {
            address: address.to_string(),
        });
    }

    let mut brokers = section
        .split(',')
        .map(|entry| BrokerEndpoint::parse(entry, address))
        .collect::<Result<Vec<_>, _>>()?;
    brokers.sort();
    Ok(brokers)
}

/// Parsed Kafka source address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KafkaConnectionString {
    brokers: Vec<BrokerEndpoint>,
    topic: String,
    secure: bool,
}

impl KafkaConnectionString {
    /// Parse a raw address into its canonical structure
    pub fn parse(raw: &str) -> Result<Self, AddressFormatError> {
        let address = raw.trim();

        let (rest, secure) = if let Some(rest) = address.strip_prefix(SCHEME_KAFKA_SSL) {
            (rest, true)
        } else if let Some(rest) = address.strip_prefix(SCHEME_KAFKA) {
            (rest, false)
        } else {
            return Err(AddressFormatError::MissingScheme {
                address: raw.to_string(),
            });
        };

        let (broker_section, topic) =
            rest.rsplit_once('/').ok_or_else(|| AddressFormatError::MissingTopic {
                address: raw.to_string(),
            })?;
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AddressFormatError::MissingTopic {
                address: raw.to_string(),
            });
        }

        let brokers = parse_broker_section(broker_section, raw)?;

        Ok(Self {
            brokers,
            topic: topic.to_string(),
            secure,
        })
    }

    /// Brokers in canonical order
    pub fn brokers(&self) -> &[BrokerEndpoint] {
        &self.brokers
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Whether the address uses the TLS scheme
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Broker list formatted for a Kafka client's `bootstrap.servers`
    pub fn bootstrap_servers(&self) -> String {
        self.brokers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Deterministic textual form; independent of the input broker order
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for KafkaConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = if self.secure {
            SCHEME_KAFKA_SSL
        } else {
            SCHEME_KAFKA
        };
        write!(f, "{}{}/{}", scheme, self.bootstrap_servers(), self.topic)
    }
}

impl std::str::FromStr for KafkaConnectionString {
    type Err = AddressFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
