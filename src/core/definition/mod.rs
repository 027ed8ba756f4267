// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod start_position;
pub mod stream_definition;

pub use start_position::{CoverageGaps, StartPositionMap};
pub use stream_definition::{DestinationSpec, SourceSpec, StreamDefinition, START_POSITION};
