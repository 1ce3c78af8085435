//! # cp-cli
//!
//! Library side of the `capacity-planner` binary: snapshot loading, the
//! computation behind each subcommand and table rendering.

pub mod commands;
pub mod render;
pub mod snapshot;

pub use commands::{OccurrenceReport, WorkloadReport};
pub use snapshot::{Snapshot, SnapshotFile};
