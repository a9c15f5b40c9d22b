//! Level Setup
//!
//! Level layouts, their validation, and spawning them into a world.

pub mod demo;
pub mod level;

pub use demo::demo_level;
pub use level::*;
