//! World Components
//!
//! Positions and steering targets, plus the level-wide clock, player pose and
//! outcome resources.

use bevy_ecs::prelude::*;
use glam::Vec3;
use stalker_events::Outcome;

/// Component: an entity's position in the level
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Position(pub Vec3);

/// Component: where the agent is walking and how fast
#[derive(Component, Debug, Clone)]
pub struct Navigator {
    destination: Option<Vec3>,
    pub speed: f32,
    pub stopping_distance: f32,
    /// Movement frozen (stunned or caught)
    pub halted: bool,
}

impl Navigator {
    pub fn new(speed: f32, stopping_distance: f32) -> Self {
        Self {
            destination: None,
            speed,
            stopping_distance,
            halted: false,
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    /// Re-issuing the same destination is harmless
    pub fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(destination);
    }

    /// Drop the current path
    pub fn clear(&mut self) {
        self.destination = None;
    }

    /// Freeze in place and drop the current path
    pub fn halt(&mut self) {
        self.halted = true;
        self.destination = None;
    }

    pub fn resume(&mut self) {
        self.halted = false;
    }

    /// No destination, or within stopping distance of it
    pub fn has_arrived(&self, position: Vec3) -> bool {
        self.destination
            .map_or(true, |d| d.distance(position) <= self.stopping_distance)
    }
}

/// Resource: the player as reported by the host each tick
#[derive(Resource, Debug, Clone)]
pub struct PlayerPose {
    /// Feet position
    pub position: Vec3,
    /// Normalized look direction, used by the flashlight
    pub facing: Vec3,
    pub crouched: bool,
    pub eye_height: f32,
}

impl PlayerPose {
    pub fn standing(position: Vec3) -> Self {
        Self {
            position,
            facing: Vec3::Z,
            crouched: false,
            eye_height: 0.6,
        }
    }

    pub fn crouching(position: Vec3) -> Self {
        Self {
            crouched: true,
            eye_height: 0.3,
            ..Self::standing(position)
        }
    }

    pub fn facing(mut self, facing: Vec3) -> Self {
        self.facing = facing.normalize_or_zero();
        self
    }

    pub fn eye(&self) -> Vec3 {
        self.position + Vec3::Y * self.eye_height
    }
}

/// Resource: simulation time
#[derive(Resource, Debug, Clone)]
pub struct SimClock {
    pub tick: u64,
    /// Seconds of simulated time
    pub elapsed: f64,
    /// Scaled delta of the current tick
    pub dt: f32,
    /// 0.0 once the level is frozen
    pub time_scale: f32,
    pub max_dt: f32,
}

/// Largest tick delta used when the tuned value is unusable
pub const DEFAULT_MAX_DT: f32 = 0.1;

impl SimClock {
    /// A non-finite `max_dt` falls back to the default; negative counts as zero
    pub fn new(max_dt: f32) -> Self {
        let max_dt = if max_dt.is_finite() { max_dt.max(0.0) } else { DEFAULT_MAX_DT };
        Self {
            tick: 0,
            elapsed: 0.0,
            dt: 0.0,
            time_scale: 1.0,
            max_dt,
        }
    }

    /// Advance by a raw frame delta; negative and non-finite deltas count as zero
    pub fn advance(&mut self, raw_dt: f32) {
        let raw_dt = if raw_dt.is_finite() { raw_dt } else { 0.0 };
        let dt = raw_dt.clamp(0.0, self.max_dt) * self.time_scale;
        self.tick += 1;
        self.dt = dt;
        self.elapsed += dt as f64;
    }

    pub fn freeze(&mut self) {
        self.time_scale = 0.0;
        self.dt = 0.0;
    }

    pub fn is_frozen(&self) -> bool {
        self.time_scale == 0.0
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DT)
    }
}

/// Resource: how the level stands
#[derive(Resource, Debug, Clone, Default)]
pub struct GameOutcome(pub Outcome);

impl GameOutcome {
    pub fn is_running(&self) -> bool {
        self.0.is_running()
    }

    /// First cause wins; returns false if the level had already ended
    pub fn trigger_game_over(&mut self, cause: impl Into<String>) -> bool {
        if !self.is_running() {
            return false;
        }
        self.0 = Outcome::GameOver { cause: cause.into() };
        true
    }

    pub fn clear_level(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.0 = Outcome::Cleared;
        true
    }
}

/// Run condition: systems only advance while the level is live
pub fn level_running(outcome: Res<GameOutcome>) -> bool {
    outcome.is_running()
}
