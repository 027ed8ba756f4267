// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registration-time admission of Kafka-sourced stream definitions.
//!
//! See [`core::validation::SourceValidationGate`] for the entry point.

pub mod core;
