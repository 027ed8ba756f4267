// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Metadata Probe
//!
//! Short-lived, metadata-only connections to a broker cluster.
//!
//! Connections are always used through [`with_connection`], which owns the
//! connection for the duration of a closure and closes it on every exit path:
//!
//! ```text
//! with_connection(probe, address, |conn| ...)
//!     probe.open(address) ──► ProbeSession ──► f(conn) ──► drop(ProbeSession) ──► conn.close()
//! ```
//!
//! A failed `open` acquires nothing, so there is nothing to close.

use super::connection_string::KafkaConnectionString;
use crate::core::error::MetadataError;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Opens metadata connections for a parsed source address
pub trait MetadataProbe: Debug + Send + Sync {
    fn open(
        &self,
        address: &KafkaConnectionString,
    ) -> Result<Box<dyn MetadataConnection>, MetadataError>;
}

/// An open metadata connection
pub trait MetadataConnection {
    /// Number of partitions of `topic`
    ///
    /// `Ok(None)` means the broker has no usable metadata for the topic (typically the
    /// topic does not exist and auto-creation is disabled). It must not be read as zero.
    fn partition_count(&self, topic: &str) -> Result<Option<u32>, MetadataError>;

    /// Release the connection. Called exactly once by the owning session.
    fn close(&mut self);
}

/// Owns an open connection and closes it when dropped
struct ProbeSession {
    connection: Box<dyn MetadataConnection>,
}

impl Drop for ProbeSession {
    fn drop(&mut self) {
        self.connection.close();
    }
}

/// Run `f` against a freshly opened connection, closing it afterwards
///
/// The connection is closed whether `f` returns `Ok`, returns `Err`, or panics.
/// Errors from opening the connection are converted with `E::from`.
pub fn with_connection<T, E, F>(
    probe: &dyn MetadataProbe,
    address: &KafkaConnectionString,
    f: F,
) -> Result<T, E>
where
    E: From<MetadataError>,
    F: FnOnce(&dyn MetadataConnection) -> Result<T, E>,
{
    let session = ProbeSession {
        connection: probe.open(address)?,
    };
    f(session.connection.as_ref())
}

#[derive(Debug, Clone)]
enum InjectedFailure {
    Open(String),
    Fetch(String),
}

/// In-memory probe serving fixed partition counts
///
/// Keeps count of opened and closed connections so callers can check that every
/// connection was released.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadataProbe {
    topics: Arc<HashMap<String, u32>>,
    failure: Option<InjectedFailure>,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl StaticMetadataProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a topic with its partition count
    pub fn with_topic(mut self, topic: impl Into<String>, partitions: u32) -> Self {
        Arc::make_mut(&mut self.topics).insert(topic.into(), partitions);
        self
    }

    /// Make every `open` fail as if the cluster were unreachable
    pub fn unreachable(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(InjectedFailure::Open(message.into()));
        self
    }

    /// Make every metadata fetch fail after the connection is opened
    pub fn failing_fetch(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(InjectedFailure::Fetch(message.into()));
        self
    }

    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl MetadataProbe for StaticMetadataProbe {
    fn open(
        &self,
        address: &KafkaConnectionString,
    ) -> Result<Box<dyn MetadataConnection>, MetadataError> {
        if let Some(InjectedFailure::Open(message)) = &self.failure {
            return Err(MetadataError::connection_unavailable(format!(
                "{} ({})",
                message,
                address.bootstrap_servers()
            )));
        }

        self.opened.fetch_add(1, Ordering::SeqCst);
        let fetch_failure = match &self.failure {
            Some(InjectedFailure::Fetch(message)) => Some(message.clone()),
            _ => None,
        };
        Ok(Box::new(StaticConnection {
            topics: Arc::clone(&self.topics),
            fetch_failure,
            closed: Arc::clone(&self.closed),
            open: true,
        }))
    }
}

struct StaticConnection {
    topics: Arc<HashMap<String, u32>>,
    fetch_failure: Option<String>,
    closed: Arc<AtomicUsize>,
    open: bool,
}

impl MetadataConnection for StaticConnection {
    fn partition_count(&self, topic: &str) -> Result<Option<u32>, MetadataError> {
        if let Some(message) = &self.fetch_failure {
            return Err(MetadataError::fetch(topic, message.clone()));
        }
        Ok(self.topics.get(topic).copied())
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn address() -> KafkaConnectionString {
        KafkaConnectionString::parse("kafka://b1:9092/orders").unwrap()
    }

    #[test]
    fn test_connection_closed_after_success() {
        let probe = StaticMetadataProbe::new().with_topic("orders", 3);
        let count: Result<Option<u32>, MetadataError> =
            with_connection(&probe, &address(), |conn| conn.partition_count("orders"));

        assert_eq!(count.unwrap(), Some(3));
        assert_eq!(probe.open_count(), 1);
        assert_eq!(probe.close_count(), 1);
    }

    #[test]
    fn test_unknown_topic_is_none() {
        let probe = StaticMetadataProbe::new();
        let count: Result<Option<u32>, MetadataError> =
            with_connection(&probe, &address(), |conn| conn.partition_count("orders"));
        assert_eq!(count.unwrap(), None);
    }

    #[test]
    fn test_connection_closed_after_error() {
        let probe = StaticMetadataProbe::new().failing_fetch("timed out");
        let result: Result<Option<u32>, MetadataError> =
            with_connection(&probe, &address(), |conn| conn.partition_count("orders"));

        assert!(matches!(result, Err(MetadataError::Fetch { .. })));
        assert_eq!(probe.open_count(), 1);
        assert_eq!(probe.close_count(), 1);
    }

    #[test]
    fn test_connection_closed_after_panic() {
        let probe = StaticMetadataProbe::new().with_topic("orders", 1);
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _: Result<(), MetadataError> = with_connection(&probe, &address(), |_| {
                panic!("boom");
            });
        }));

        assert!(outcome.is_err());
        assert_eq!(probe.close_count(), 1);
    }

    #[test]
    fn test_failed_open_acquires_nothing() {
        let probe = StaticMetadataProbe::new().unreachable("no route to host");
        let result: Result<(), MetadataError> =
            with_connection(&probe, &address(), |_| Ok(()));

        assert!(matches!(
            result,
            Err(MetadataError::ConnectionUnavailable { .. })
        ));
        assert_eq!(probe.open_count(), 0);
        assert_eq!(probe.close_count(), 0);
    }

    #[test]
    fn test_clones_share_counters() {
        let probe = StaticMetadataProbe::new().with_topic("orders", 2);
        let clone = probe.clone();
        let _: Result<Option<u32>, MetadataError> =
            with_connection(&clone, &address(), |conn| conn.partition_count("orders"));
        assert_eq!(probe.open_count(), 1);
        assert_eq!(probe.close_count(), 1);
    }
}
