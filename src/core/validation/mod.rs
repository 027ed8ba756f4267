// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registration-time validation of stream definitions
//!
//! The source-validation gate runs once per definition before it is accepted by the
//! connector; a rejected definition is never registered.

pub mod reporter;
pub mod source_validation;

pub use reporter::{LogReporter, ValidationReporter};
pub use source_validation::SourceValidationGate;
