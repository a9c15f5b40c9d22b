//! Shared event types and serialization for the stalker simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod event;
pub mod snapshot;
pub mod types;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

// Re-export event types
pub use event::{generate_event_id, EventPayload, SimEvent};

// Re-export snapshot types
pub use snapshot::{
    generate_snapshot_id, AgentSnapshot, FlashlightSnapshot, LevelSnapshot, VoiceSnapshot,
};

// Re-export shared vocabulary
pub use types::{
    AgentKind, BehaviorState, ChannelClass, Direction, Outcome, Verdict, VisualState, VoiceOutput,
};
