// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod connector_config;

pub use connector_config::{ConfigError, ConnectorConfig};
