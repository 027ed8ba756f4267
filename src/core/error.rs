// SPDX-License-Identifier: MIT OR Apache-2.0

//! StreamGate Core Error Types
//!
//! Failure kinds raised while admitting a stream definition, plus the lower-level
//! errors produced by the address parser and the metadata probe.

use std::fmt;
use thiserror::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Stable classification of a [`ValidationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationFailureKind {
    Format,
    WildcardNotAllowed,
    ClusterNotWhitelisted,
    TopicUnavailable,
    PartitionCountMismatch,
    StartPositionIncomplete,
    Internal,
}

impl ValidationFailureKind {
    /// Kebab-case name used in logs and CLI output
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ValidationFailureKind::Format => "format",
            ValidationFailureKind::WildcardNotAllowed => "wildcard-not-allowed",
            ValidationFailureKind::ClusterNotWhitelisted => "cluster-not-whitelisted",
            ValidationFailureKind::TopicUnavailable => "topic-unavailable",
            ValidationFailureKind::PartitionCountMismatch => "partition-count-mismatch",
            ValidationFailureKind::StartPositionIncomplete => "start-position-incomplete",
            ValidationFailureKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ValidationFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason a stream definition was refused admission
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid connection string '{address}': {reason}")]
    Format { address: String, reason: String },

    #[error("Wildcard characters are not allowed in {address}")]
    WildcardNotAllowed { address: String },

    #[error(
        "Kafka connector is not white-listed for the cluster {address}. \
         Current white-listed clusters [{whitelist}]"
    )]
    ClusterNotWhitelisted { address: String, whitelist: String },

    #[error(
        "Can't get partition info from kafka for topic '{topic}'. Very likely that auto topic \
         creation is disabled on the broker and the topic doesn't exist"
    )]
    TopicUnavailable { topic: String },

    #[error(
        "Source is configured with {declared} partitions, but the topic {topic} actually has \
         {actual} partitions"
    )]
    PartitionCountMismatch {
        topic: String,
        declared: u32,
        actual: u32,
    },

    #[error(
        "Missing partitions starting offset for datastream {stream}: missing partitions \
         {missing:?}, unexpected partitions {unexpected:?}"
    )]
    StartPositionIncomplete {
        stream: String,
        missing: Vec<u32>,
        unexpected: Vec<i64>,
    },

    #[error("Initialization failed: {message}")]
    Internal { message: String },
}

impl ValidationError {
    /// Create a format error for a raw address
    pub fn format(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create a wildcard error naming the offending address
    pub fn wildcard_not_allowed(address: impl Into<String>) -> Self {
        Self::WildcardNotAllowed {
            address: address.into(),
        }
    }

    pub fn cluster_not_whitelisted(
        address: impl Into<String>,
        whitelist: impl Into<String>,
    ) -> Self {
        Self::ClusterNotWhitelisted {
            address: address.into(),
            whitelist: whitelist.into(),
        }
    }

    pub fn topic_unavailable(topic: impl Into<String>) -> Self {
        Self::TopicUnavailable {
            topic: topic.into(),
        }
    }

    pub fn partition_count_mismatch(topic: impl Into<String>, declared: u32, actual: u32) -> Self {
        Self::PartitionCountMismatch {
            topic: topic.into(),
            declared,
            actual,
        }
    }

    pub fn start_position_incomplete(
        stream: impl Into<String>,
        missing: Vec<u32>,
        unexpected: Vec<i64>,
    ) -> Self {
        Self::StartPositionIncomplete {
            stream: stream.into(),
            missing,
            unexpected,
        }
    }

    /// Wrap an unexpected failure, keeping only its message
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ValidationFailureKind {
        match self {
            ValidationError::Format { .. } => ValidationFailureKind::Format,
            ValidationError::WildcardNotAllowed { .. } => ValidationFailureKind::WildcardNotAllowed,
            ValidationError::ClusterNotWhitelisted { .. } => {
                ValidationFailureKind::ClusterNotWhitelisted
            }
            ValidationError::TopicUnavailable { .. } => ValidationFailureKind::TopicUnavailable,
            ValidationError::PartitionCountMismatch { .. } => {
                ValidationFailureKind::PartitionCountMismatch
            }
            ValidationError::StartPositionIncomplete { .. } => {
                ValidationFailureKind::StartPositionIncomplete
            }
            ValidationError::Internal { .. } => ValidationFailureKind::Internal,
        }
    }
}

impl From<AddressFormatError> for ValidationError {
    fn from(err: AddressFormatError) -> Self {
        ValidationError::Format {
            address: err.address().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Grammar violation in a broker/topic address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressFormatError {
    #[error("missing or unsupported scheme (expected kafka:// or kafkassl://)")]
    MissingScheme { address: String },

    #[error("missing '/<topic>' section")]
    MissingTopic { address: String },

    #[error("broker list is empty")]
    EmptyBrokerList { address: String },

    #[error("malformed broker '{broker}': {reason}")]
    MalformedBroker {
        address: String,
        broker: String,
        reason: String,
    },
}

impl AddressFormatError {
    /// The raw text that failed to parse
    pub fn address(&self) -> &str {
        match self {
            AddressFormatError::MissingScheme { address }
            | AddressFormatError::MissingTopic { address }
            | AddressFormatError::EmptyBrokerList { address }
            | AddressFormatError::MalformedBroker { address, .. } => address,
        }
    }
}

/// Failure talking to the broker cluster while probing metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Connection unavailable: {message}")]
    ConnectionUnavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to fetch metadata for topic '{topic}': {message}")]
    Fetch {
        topic: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl MetadataError {
    /// Create a connection unavailable error
    pub fn connection_unavailable(message: impl Into<String>) -> Self {
        Self::ConnectionUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection unavailable error with source
    pub fn connection_unavailable_with_source(
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::ConnectionUnavailable {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn fetch(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            topic: topic.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn fetch_with_source(
        topic: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Fetch {
            topic: topic.into(),
            message: message.into(),
            source: Some(source),
        }
    }
}
