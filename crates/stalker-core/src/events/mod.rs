//! Event System
//!
//! In-memory event queue filled by systems, and the JSONL writer that
//! persists it.

pub mod log;
pub mod logger;

pub use log::EventLog;
pub use logger::EventLogger;
