//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // stalker-events = { path = "../stalker-events", features = ["test-fixtures"] }
//!
//! use stalker_events::fixtures;
//!
//! let events = fixtures::sample_events();
//! ```

use crate::SimEvent;

/// Returns sample events from the fixtures file.
///
/// A short run in which the player is lied to at an intersection, warned by a
/// listener, chased, stuns the listener and is then caught by a shader.
pub fn sample_events() -> Vec<SimEvent> {
    let jsonl = include_str!("../tests/fixtures/sample_events.jsonl");
    jsonl
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            SimEvent::from_jsonl(l).unwrap_or_else(|e| {
                panic!("Failed to parse event line: {}\nError: {}", l, e)
            })
        })
        .collect()
}
