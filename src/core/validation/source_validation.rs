// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Source Validation Gate
//!
//! Admits a Kafka-sourced stream definition at registration time by reconciling it
//! against the live cluster.
//!
//! ## Pipeline
//!
//! ```text
//! parse address ─► default serdes ─► wildcard check ─► whitelist check
//!     ─► [probe: partition count ─► reconcile declared count] ─► start positions ─► write back
//! ```
//!
//! The first failing stage aborts validation. The metadata probe is only opened once
//! the address has passed the wildcard and whitelist checks, and it is closed before
//! the start positions are checked.
//!
//! The definition's source is rewritten (canonical address, resolved partition count)
//! only when every stage passes. Serde defaults are applied to the destination as soon
//! as the address parses and are kept even if a later stage rejects the definition.

use crate::core::config::{ConfigError, ConnectorConfig};
use crate::core::definition::{StartPositionMap, StreamDefinition};
use crate::core::error::{MetadataError, ValidationError, ValidationResult};
#[cfg(feature = "kafka")]
use crate::core::kafka::KafkaMetadataProbe;
use crate::core::kafka::{
    has_wildcard, with_connection, KafkaConnectionString, MetadataProbe, WhitelistRegistry,
};
use crate::core::validation::reporter::{LogReporter, ValidationReporter};
use std::sync::Arc;
use thiserror::Error;

/// Everything that can stop the pipeline. Only `Rejected` reaches callers unchanged.
#[derive(Error, Debug)]
enum GateError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error("{0}")]
    Metadata(#[from] MetadataError),

    #[error("Malformed start-position metadata: {0}")]
    StartPosition(#[from] serde_json::Error),
}

/// Values written back onto an admitted definition
struct Admission {
    canonical: String,
    partitions: u32,
}

/// Stateless admission check for Kafka source definitions
///
/// Safe to share between threads; `validate` only reads the gate.
#[derive(Debug)]
pub struct SourceValidationGate {
    config: ConnectorConfig,
    whitelist: WhitelistRegistry,
    probe: Arc<dyn MetadataProbe>,
    reporter: Arc<dyn ValidationReporter>,
}

impl SourceValidationGate {
    /// Create a gate; the whitelist is parsed from `config` once, here
    pub fn new(config: ConnectorConfig, probe: Arc<dyn MetadataProbe>) -> Result<Self, ConfigError> {
        let whitelist = WhitelistRegistry::from_config(config.white_listed_clusters.as_deref())?;
        if !whitelist.is_empty() {
            log::info!(
                "[SourceValidationGate] Restricting sources to clusters [{}]",
                whitelist
            );
        }

        Ok(Self {
            config,
            whitelist,
            probe,
            reporter: Arc::new(LogReporter),
        })
    }

    /// Create a gate that probes live Kafka clusters with the configured consumer properties
    #[cfg(feature = "kafka")]
    pub fn kafka(config: ConnectorConfig) -> Result<Self, ConfigError> {
        let probe = KafkaMetadataProbe::new(config.consumer.clone(), config.metadata_timeout());
        Self::new(config, Arc::new(probe))
    }

    /// Replace the default log-based failure reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn ValidationReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn whitelist(&self) -> &WhitelistRegistry {
        &self.whitelist
    }

    /// Validate `definition` and normalize it in place
    ///
    /// On success the source address is replaced by its canonical form and the
    /// partition count is set to the live value. On failure the source is left
    /// untouched; serde defaults may already have been applied to the destination.
    ///
    /// `all_definitions` are the streams already registered with the connector.
    pub fn validate(
        &self,
        definition: &mut StreamDefinition,
        all_definitions: &[StreamDefinition],
    ) -> ValidationResult<()> {
        log::info!("Initialize datastream {}", definition.name);
        log::debug!(
            "[SourceValidationGate] {} datastreams already registered",
            all_definitions.len()
        );

        match self.admit(definition) {
            Ok(admission) => {
                definition.source.connection_string = admission.canonical;
                definition.source.partitions = Some(admission.partitions);
                Ok(())
            }
            Err(GateError::Rejected(error)) => {
                self.reporter.rejected(&definition.name, &error);
                Err(error)
            }
            Err(error) => {
                self.reporter.unexpected(&definition.name, &error);
                Err(ValidationError::internal(error.to_string()))
            }
        }
    }

    fn admit(&self, definition: &mut StreamDefinition) -> Result<Admission, GateError> {
        let raw = definition.source.connection_string.clone();
        let parsed = KafkaConnectionString::parse(&raw).map_err(ValidationError::from)?;

        self.apply_default_serdes(definition);

        if has_wildcard(parsed.topic()) {
            return Err(ValidationError::wildcard_not_allowed(&raw).into());
        }

        if !self.whitelist.is_allowed(&parsed) {
            return Err(
                ValidationError::cluster_not_whitelisted(&raw, self.whitelist.to_string()).into(),
            );
        }

        let partitions = self.resolve_partitions(&parsed, definition.source.partitions)?;

        if let Some(json) = definition.start_position() {
            let offsets = StartPositionMap::decode(json)?;
            let gaps = offsets.coverage(partitions);
            if !gaps.is_empty() {
                return Err(ValidationError::start_position_incomplete(
                    &definition.name,
                    gaps.missing,
                    gaps.unexpected,
                )
                .into());
            }
        }

        Ok(Admission {
            canonical: parsed.canonical(),
            partitions,
        })
    }

    /// Fill in missing destination serdes from non-blank connector defaults
    fn apply_default_serdes(&self, definition: &mut StreamDefinition) {
        let Some(destination) = definition.destination.as_mut() else {
            return;
        };

        if destination.key_serde.is_none() {
            if let Some(serde) = self.config.default_key_serde() {
                destination.key_serde = Some(serde.to_string());
            }
        }
        if destination.value_serde.is_none() {
            if let Some(serde) = self.config.default_value_serde() {
                destination.value_serde = Some(serde.to_string());
            }
        }
    }

    /// Query the live partition count and reconcile it with the declared one
    fn resolve_partitions(
        &self,
        parsed: &KafkaConnectionString,
        declared: Option<u32>,
    ) -> Result<u32, GateError> {
        let topic = parsed.topic();

        with_connection(self.probe.as_ref(), parsed, |conn| -> Result<u32, GateError> {
            let actual = conn
                .partition_count(topic)?
                .ok_or_else(|| ValidationError::topic_unavailable(topic))?;

            match declared {
                None => {
                    log::info!("Kafka source {} has {} partitions.", parsed, actual);
                    Ok(actual)
                }
                Some(declared) if declared != actual => {
                    Err(ValidationError::partition_count_mismatch(topic, declared, actual).into())
                }
                Some(_) => Ok(actual),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::definition::{DestinationSpec, START_POSITION};
    use crate::core::error::ValidationFailureKind;
    use crate::core::kafka::StaticMetadataProbe;

    fn gate(config: ConnectorConfig, probe: &StaticMetadataProbe) -> SourceValidationGate {
        SourceValidationGate::new(config, Arc::new(probe.clone())).unwrap()
    }

    fn serde_defaults() -> ConnectorConfig {
        ConnectorConfig {
            default_key_serde: Some("string".to_string()),
            default_value_serde: Some("avro".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_registration_resolves_partitions() {
        let probe = StaticMetadataProbe::new().with_topic("orders", 5);
        let mut definition = StreamDefinition::new("s", "kafka://b1:9092/orders");

        gate(ConnectorConfig::default(), &probe)
            .validate(&mut definition, &[])
            .unwrap();

        assert_eq!(definition.source.partitions, Some(5));
        assert_eq!(probe.open_count(), 1);
        assert_eq!(probe.close_count(), 1);
    }

    #[test]
    fn test_matching_declared_partitions() {
        let probe = StaticMetadataProbe::new().with_topic("orders", 5);
        let mut definition = StreamDefinition::new("s", "kafka://b1:9092/orders").partitions(5);

        gate(ConnectorConfig::default(), &probe)
            .validate(&mut definition, &[])
            .unwrap();
        assert_eq!(definition.source.partitions, Some(5));
    }

    #[test]
    fn test_serdes_defaulted_only_when_missing() {
        let probe = StaticMetadataProbe::new().with_topic("orders", 1);
        let mut definition =
            StreamDefinition::new("s", "kafka://b1:9092/orders").destination(DestinationSpec {
                key_serde: Some("bytes".to_string()),
                ..Default::default()
            });

        gate(serde_defaults(), &probe)
            .validate(&mut definition, &[])
            .unwrap();

        let destination = definition.destination.unwrap();
        assert_eq!(destination.key_serde.as_deref(), Some("bytes"));
        assert_eq!(destination.value_serde.as_deref(), Some("avro"));
    }

    #[test]
    fn test_no_destination_means_no_serdes() {
        let probe = StaticMetadataProbe::new().with_topic("orders", 1);
        let mut definition = StreamDefinition::new("s", "kafka://b1:9092/orders");

        gate(serde_defaults(), &probe)
            .validate(&mut definition, &[])
            .unwrap();
        assert!(definition.destination.is_none());
    }

    #[test]
    fn test_serde_defaults_survive_later_rejection() {
        let probe = StaticMetadataProbe::new();
        let mut definition = StreamDefinition::new("s", "kafka://b1:9092/my.topic")
            .destination(DestinationSpec::default());

        let err = gate(serde_defaults(), &probe)
            .validate(&mut definition, &[])
            .unwrap_err();

        assert_eq!(err.kind(), ValidationFailureKind::WildcardNotAllowed);
        let destination = definition.destination.unwrap();
        assert_eq!(destination.key_serde.as_deref(), Some("string"));
        assert_eq!(destination.value_serde.as_deref(), Some("avro"));
        assert_eq!(definition.source.connection_string, "kafka://b1:9092/my.topic");
    }

    #[test]
    fn test_format_failure_skips_serde_defaults() {
        let probe = StaticMetadataProbe::new();
        let mut definition =
            StreamDefinition::new("s", "b1:9092/orders").destination(DestinationSpec::default());

        let err = gate(serde_defaults(), &probe)
            .validate(&mut definition, &[])
            .unwrap_err();

        assert_eq!(err.kind(), ValidationFailureKind::Format);
        assert_eq!(definition.destination.unwrap().key_serde, None);
        assert_eq!(probe.open_count(), 0);
    }

    #[test]
    fn test_start_position_metadata_key() {
        let probe = StaticMetadataProbe::new().with_topic("orders", 2);
        let mut definition = StreamDefinition::new("s", "kafka://b1:9092/orders")
            .metadata(START_POSITION, r#"{"0":10,"1":20}"#);

        gate(ConnectorConfig::default(), &probe)
            .validate(&mut definition, &[])
            .unwrap();
    }

    #[test]
    fn test_invalid_whitelist_config() {
        let config = ConnectorConfig {
            white_listed_clusters: Some("not-a-broker".to_string()),
            ..Default::default()
        };
        let result = SourceValidationGate::new(config, Arc::new(StaticMetadataProbe::new()));
        assert!(matches!(result, Err(ConfigError::Whitelist(_))));
    }
}
