// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod config;
pub mod definition;
pub mod error;
pub mod kafka;
pub mod validation;

pub use self::config::{ConfigError, ConnectorConfig};
pub use self::definition::{DestinationSpec, SourceSpec, StartPositionMap, StreamDefinition};
pub use self::error::{
    AddressFormatError, MetadataError, ValidationError, ValidationFailureKind, ValidationResult,
};
pub use self::validation::{LogReporter, SourceValidationGate, ValidationReporter};
