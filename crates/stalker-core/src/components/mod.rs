//! ECS Components
//!
//! Entity components for agents and their bodies, plus the world-level
//! resources every system reads (clock, player pose, outcome).

pub mod agent;
pub mod world;

pub use agent::*;
pub use world::*;
