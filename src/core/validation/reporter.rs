// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::core::error::{ValidationError, ValidationFailureKind};
use std::fmt::Debug;

/// Sink for validation failures
///
/// Injected into the gate so callers can route rejections to their own telemetry.
pub trait ValidationReporter: Debug + Send + Sync {
    /// A definition was refused with one of the named failure kinds
    fn rejected(&self, stream: &str, error: &ValidationError);

    /// Validation hit an unexpected error; it is surfaced to the caller as `Internal`
    fn unexpected(&self, stream: &str, error: &(dyn std::error::Error + 'static));
}

/// Reports through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ValidationReporter for LogReporter {
    fn rejected(&self, stream: &str, error: &ValidationError) {
        match error.kind() {
            ValidationFailureKind::StartPositionIncomplete => {
                log::warn!("[SourceValidationGate] {}: {}", stream, error)
            }
            kind => log::error!("[SourceValidationGate] {} rejected ({}): {}", stream, kind, error),
        }
    }

    fn unexpected(&self, stream: &str, error: &(dyn std::error::Error + 'static)) {
        log::error!(
            "[SourceValidationGate] Initialization of {} threw an error: {:?}",
            stream,
            error
        );
        let mut source = error.source();
        while let Some(cause) = source {
            log::error!("  caused by: {}", cause);
            source = cause.source();
        }
    }
}
