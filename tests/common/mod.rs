// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::{Arc, Mutex};
use streamgate::core::{
    ConnectorConfig, SourceValidationGate, ValidationError, ValidationFailureKind,
    ValidationReporter,
};
use streamgate::core::kafka::StaticMetadataProbe;

/// Reporter that keeps every failure it sees
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub rejected: Mutex<Vec<(String, ValidationFailureKind)>>,
    pub unexpected: Mutex<Vec<(String, String)>>,
}

impl ValidationReporter for RecordingReporter {
    fn rejected(&self, stream: &str, error: &ValidationError) {
        self.rejected
            .lock()
            .unwrap()
            .push((stream.to_string(), error.kind()));
    }

    fn unexpected(&self, stream: &str, error: &(dyn std::error::Error + 'static)) {
        self.unexpected
            .lock()
            .unwrap()
            .push((stream.to_string(), error.to_string()));
    }
}

pub fn gate_with(
    config: ConnectorConfig,
    probe: &StaticMetadataProbe,
) -> (SourceValidationGate, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::default());
    let gate = SourceValidationGate::new(config, Arc::new(probe.clone()))
        .unwrap()
        .with_reporter(reporter.clone());
    (gate, reporter)
}

pub fn whitelisted(brokers: &str) -> ConnectorConfig {
    ConnectorConfig {
        white_listed_clusters: Some(brokers.to_string()),
        ..Default::default()
    }
}
