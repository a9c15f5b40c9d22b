//! Output
//!
//! Commands for the host (audio, end of level) and level snapshots.

pub mod commands;
pub mod snapshot;

pub use commands::{HostCommand, Outbox};
pub use snapshot::{generate_snapshot, write_snapshot, SnapshotGenerator};
