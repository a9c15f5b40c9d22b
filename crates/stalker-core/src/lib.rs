//! Stalker Simulation Core
//!
//! Antagonist behavior for a stealth-horror level: light-gated agents that
//! patrol, sense and pursue the player, plus an unreliable narrator that
//! whispers hints at intersections and sometimes lies.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub mod components;
pub mod config;
pub mod dialogue;
pub mod events;
pub mod geometry;
pub mod output;
pub mod setup;
pub mod sim;
pub mod systems;
pub mod voice;

pub use components::*;
pub use config::{ConfigError, Tuning};
pub use output::{HostCommand, Outbox};
pub use setup::{demo_level, LevelError, LevelLayout};
pub use sim::{SimError, Simulation};

/// Shared random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    /// Seeded for reproducible runs, entropy-backed otherwise
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(SmallRng::seed_from_u64(seed)),
            None => Self(SmallRng::from_entropy()),
        }
    }
}
