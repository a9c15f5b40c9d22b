//! Agent Behavior
//!
//! Shared plumbing for the per-kind state machines: what an agent is made
//! of, what it can see of the world this tick, and what it decided. The
//! `update_agents` system dispatches each agent to its policy.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::RngCore;
use stalker_events::{BehaviorState, EventPayload};

use super::exposure::ExposureGauge;
use super::listener::step_listener;
use super::outcome::declare_game_over;
use super::patrol::PatrolPlanner;
use super::shader::step_shader;
use crate::components::{
    AgentId, Behavior, BehaviorPolicy, GameOutcome, Illuminated, Navigator, PlayerPose, Policy, Position, Senses,
    SimClock, Warning,
};
use crate::dialogue::WhisperQueue;
use crate::events::EventLog;
use crate::geometry::{is_visible, Environment, NavLink, NavMesh, SceneGeometry};
use crate::output::Outbox;
use crate::SimRng;

/// Collaborators and time for one agent step
pub struct StepContext<'a> {
    pub dt: f32,
    pub now: f64,
    /// `None` while the host has not reported a player
    pub player: Option<&'a PlayerPose>,
    pub env: Option<&'a dyn Environment>,
    pub nav: Option<&'a dyn NavMesh>,
    pub rng: &'a mut dyn RngCore,
}

/// Mutable view of one agent's components
pub struct AgentBody<'a> {
    pub position: Vec3,
    pub senses: &'a Senses,
    pub behavior: &'a mut Behavior,
    pub gauge: &'a mut ExposureGauge,
    pub planner: &'a mut PatrolPlanner,
    pub navigator: &'a mut Navigator,
    pub warning: &'a mut Warning,
    /// Struck by light this tick
    pub lit: bool,
}

/// What an agent step decided
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Effects {
    pub transitions: Vec<(BehaviorState, BehaviorState)>,
    /// Exposure gauge crossed its threshold
    pub light_fired: bool,
    /// Claimed the one-time proximity whisper
    pub whisper: bool,
    pub caught: bool,
    pub hover_retargeted: bool,
}

impl AgentBody<'_> {
    pub fn enter(&mut self, next: BehaviorState, fx: &mut Effects) -> bool {
        match self.behavior.enter(next) {
            Some(transition) => {
                fx.transitions.push(transition);
                true
            }
            None => false,
        }
    }

    pub fn distance_to(&self, player: &PlayerPose) -> f32 {
        self.position.distance(player.position)
    }

    /// Caught is checked before anything else, stunned or not
    pub fn try_catch(&mut self, distance: f32, fx: &mut Effects) -> bool {
        if distance > self.senses.catch_radius {
            return false;
        }
        self.enter(BehaviorState::Caught, fx);
        self.navigator.halt();
        fx.caught = true;
        true
    }

    /// Track the warning ring and claim the whisper on first entry into
    /// the band outside detection
    pub fn sense_warning(&mut self, distance: f32, now: f64, fx: &mut Effects) {
        self.behavior.in_warning_zone = distance <= self.senses.warning_radius;
        if self.senses.in_warning_band(distance) && self.warning.claim(now) {
            fx.whisper = true;
        }
    }

    /// Unobstructed line from the agent's eyes toward the player's feet,
    /// capped at the detection radius. No environment means nothing blocks.
    pub fn can_see(&self, player: &PlayerPose, env: Option<&dyn Environment>) -> bool {
        let Some(env) = env else {
            return true;
        };
        is_visible(
            env,
            self.position,
            player.position,
            self.senses.eye_height,
            self.senses.detection_radius,
            self.senses.sight_mask,
            None,
        )
        .is_visible()
    }

    /// Wander at `speed`
    pub fn patrol(&mut self, speed: f32, ctx: &mut StepContext) {
        self.navigator.speed = speed;
        self.planner
            .step(ctx.dt, self.position, self.navigator, ctx.nav, &mut *ctx.rng);
    }
}

/// System: advance every agent's state machine by one tick
#[allow(clippy::too_many_arguments)]
pub fn update_agents(
    mut clock: ResMut<SimClock>,
    mut rng: ResMut<SimRng>,
    player: Option<Res<PlayerPose>>,
    scene: Option<Res<SceneGeometry>>,
    navlink: Option<Res<NavLink>>,
    mut outcome: ResMut<GameOutcome>,
    mut log: ResMut<EventLog>,
    mut outbox: ResMut<Outbox>,
    mut whispers: ResMut<WhisperQueue>,
    mut agents: Query<(
        &AgentId,
        &Position,
        &Senses,
        &mut Policy,
        &mut Behavior,
        &mut ExposureGauge,
        &mut PatrolPlanner,
        &mut Navigator,
        &mut Warning,
        &mut Illuminated,
    )>,
) {
    let mut ctx = StepContext {
        dt: clock.dt,
        now: clock.elapsed,
        player: player.as_deref(),
        env: scene.as_ref().map(|s| &*s.0 as &dyn Environment),
        nav: navlink.as_ref().map(|n| &*n.0 as &dyn NavMesh),
        rng: &mut rng.0,
    };

    for (id, position, senses, mut policy, mut behavior, mut gauge, mut planner, mut navigator, mut warning, mut lit) in
        agents.iter_mut()
    {
        if !outcome.is_running() {
            break;
        }

        let kind = policy.kind();
        let mut body = AgentBody {
            position: position.0,
            senses,
            behavior: &mut *behavior,
            gauge: &mut *gauge,
            planner: &mut *planner,
            navigator: &mut *navigator,
            warning: &mut *warning,
            lit: lit.0,
        };
        let fx = match &mut policy.0 {
            BehaviorPolicy::Listener(p) => step_listener(p, &mut body, &mut ctx),
            BehaviorPolicy::Shader(p) => step_shader(p, &mut body, &mut ctx),
        };
        lit.0 = false;

        if fx.light_fired {
            log.record(
                &clock,
                EventPayload::LightThreshold {
                    agent_id: id.0.clone(),
                    kind,
                },
            );
        }
        for (from, to) in &fx.transitions {
            tracing::info!("{} {}: {} -> {}", kind, id.as_str(), from, to);
            log.record(
                &clock,
                EventPayload::StateChanged {
                    agent_id: id.0.clone(),
                    kind,
                    from: *from,
                    to: *to,
                },
            );
        }
        if fx.whisper {
            whispers.push(id.0.clone(), kind);
        }
        if fx.caught {
            let cause = format!("caught by {} {}", kind, id.as_str());
            declare_game_over(&mut outcome, &mut clock, &mut outbox, &mut log, &cause, Some(id.as_str()));
        }
    }
}
