//! Agent Components
//!
//! Identity, senses, behavior state and per-kind policy for antagonist agents.

use bevy_ecs::prelude::*;
use stalker_events::{AgentKind, BehaviorState, VisualState};

use crate::config::{ListenerTuning, ShaderTuning};
use crate::geometry::Layers;

/// Marker component identifying an entity as an agent
#[derive(Component, Debug, Clone, Default)]
pub struct Agent;

/// Unique identifier for an agent
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Detection radii, all measured from the agent's feet
#[derive(Component, Debug, Clone)]
pub struct Senses {
    /// Outer ring: proximity whisper, no pursuit
    pub warning_radius: f32,
    /// Inner ring: pursuit (listener) or hovering (shader)
    pub detection_radius: f32,
    /// Touching distance; ends the level
    pub catch_radius: f32,
    pub eye_height: f32,
    /// Layers that block this agent's line of sight
    pub sight_mask: Layers,
}

impl Senses {
    pub fn for_listener(tuning: &ListenerTuning) -> Self {
        Self {
            warning_radius: tuning.warning_radius,
            detection_radius: tuning.detection_radius,
            catch_radius: tuning.catch_radius,
            eye_height: tuning.eye_height,
            sight_mask: Layers::ENVIRONMENT,
        }
    }

    pub fn for_shader(tuning: &ShaderTuning) -> Self {
        Self {
            warning_radius: tuning.warning_radius,
            detection_radius: tuning.detection_radius,
            catch_radius: tuning.catch_radius,
            eye_height: tuning.eye_height,
            sight_mask: Layers::ENVIRONMENT,
        }
    }

    /// Inside the warning ring but not yet detected
    pub fn in_warning_band(&self, distance: f32) -> bool {
        distance <= self.warning_radius && distance > self.detection_radius
    }
}

/// Listener movement table and stun countdown
#[derive(Debug, Clone)]
pub struct ListenerPolicy {
    pub wander_speed: f32,
    pub chase_speed: f32,
    pub stun_duration: f32,
    pub stun_timer: f32,
}

impl ListenerPolicy {
    pub fn from_tuning(tuning: &ListenerTuning) -> Self {
        Self {
            wander_speed: tuning.wander_speed,
            chase_speed: tuning.chase_speed,
            stun_duration: tuning.stun_duration,
            stun_timer: 0.0,
        }
    }
}

/// Shader movement table, hover cadence and de-aggro threshold
#[derive(Debug, Clone)]
pub struct ShaderPolicy {
    pub patrol_speed: f32,
    pub hover_speed: f32,
    pub chase_speed: f32,
    pub hover_radius: f32,
    pub hover_interval: (f32, f32),
    pub hover_timer: f32,
    pub deaggro_radius: f32,
}

impl ShaderPolicy {
    pub fn from_tuning(tuning: &ShaderTuning) -> Self {
        let min = tuning.hover_interval_min.min(tuning.hover_interval_max);
        let max = tuning.hover_interval_min.max(tuning.hover_interval_max);
        Self {
            patrol_speed: tuning.patrol_speed,
            hover_speed: tuning.hover_speed,
            chase_speed: tuning.chase_speed,
            hover_radius: tuning.hover_radius,
            hover_interval: (min, max),
            hover_timer: 0.0,
            deaggro_radius: tuning.deaggro_radius(),
        }
    }
}

/// Per-kind transition and speed tables
#[derive(Debug, Clone)]
pub enum BehaviorPolicy {
    Listener(ListenerPolicy),
    Shader(ShaderPolicy),
}

/// Component wrapping the agent's behavior policy
#[derive(Component, Debug, Clone)]
pub struct Policy(pub BehaviorPolicy);

impl Policy {
    pub fn kind(&self) -> AgentKind {
        match self.0 {
            BehaviorPolicy::Listener(_) => AgentKind::Listener,
            BehaviorPolicy::Shader(_) => AgentKind::Shader,
        }
    }
}

/// Current behavior state of an agent
#[derive(Component, Debug, Clone, Default)]
pub struct Behavior {
    state: BehaviorState,
    /// Player is somewhere inside the warning ring
    pub in_warning_zone: bool,
}

impl Behavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn is(&self, state: BehaviorState) -> bool {
        self.state == state
    }

    /// Move to `next`, returning the (from, to) pair when the state changed.
    /// Terminal states never change again.
    pub fn enter(&mut self, next: BehaviorState) -> Option<(BehaviorState, BehaviorState)> {
        if self.state == next || self.state.is_terminal() {
            return None;
        }
        let previous = self.state;
        self.state = next;
        Some((previous, next))
    }

    /// Discrete feedback state for an external renderer
    pub fn visual(&self) -> VisualState {
        match self.state {
            BehaviorState::Stunned => VisualState::Stunned,
            BehaviorState::Chasing | BehaviorState::Aggroed | BehaviorState::Caught => VisualState::Aggro,
            BehaviorState::Hovering => VisualState::Warning,
            BehaviorState::Patrol if self.in_warning_zone => VisualState::Warning,
            BehaviorState::Patrol => VisualState::Idle,
        }
    }
}

/// One-time proximity warning bookkeeping
#[derive(Component, Debug, Clone, Default)]
pub struct Warning {
    /// Never resets within a level
    pub has_whispered: bool,
    pub whispered_at: Option<f64>,
}

impl Warning {
    /// Claim the single whisper this agent gets; false if already spent
    pub fn claim(&mut self, now: f64) -> bool {
        if self.has_whispered {
            return false;
        }
        self.has_whispered = true;
        self.whispered_at = Some(now);
        true
    }
}

/// Set when a light source struck the agent this tick
#[derive(Component, Debug, Clone, Default)]
pub struct Illuminated(pub bool);
