//! Simulation Facade
//!
//! Owns the ECS world and the per-tick schedule. Hosts push in the player
//! pose and external signals, tick, then drain commands and events.

use std::collections::HashMap;

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use glam::Vec3;
use stalker_events::{BehaviorState, Direction, LevelSnapshot, Outcome, SimEvent, VisualState};

use crate::components::{
    level_running, Behavior, GameOutcome, Illuminated, PlayerPose, Position, SimClock,
};
use crate::config::{ConfigError, Tuning};
use crate::dialogue::{
    process_hints, process_whispers, HintEngine, HintQueue, MarkerContact, WhisperEngine, WhisperQueue,
};
use crate::events::EventLog;
use crate::geometry::{Environment, NavLink, NavMesh, SceneGeometry};
use crate::output::{generate_snapshot, HostCommand, Outbox, SnapshotGenerator};
use crate::setup::{build_navmesh, build_scene, spawn_level, LevelError, LevelLayout, SpawnSummary};
use crate::systems::{
    detect_trigger_entries, move_agents, update_agents, update_flashlight, ExposureGauge, Flashlight,
};
use crate::voice::{advance_voice, fire_narration_cues, NarrationSchedule, VoiceArbiter};
use crate::SimRng;

/// Simulation error type
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Unknown agent `{0}`")]
    UnknownAgent(String),
}

/// One running level
pub struct Simulation {
    world: World,
    schedule: Schedule,
    agents: HashMap<String, Entity>,
    summary: SpawnSummary,
}

impl Simulation {
    /// Build a level with geometry derived from its layout
    pub fn new(tuning: &Tuning, layout: &LevelLayout, seed: Option<u64>) -> Result<Self, SimError> {
        Self::with_collaborators(
            tuning,
            layout,
            seed,
            Box::new(build_scene(layout)),
            Box::new(build_navmesh(layout)),
        )
    }

    /// Build a level against host-provided raycast and navmesh services
    pub fn with_collaborators(
        tuning: &Tuning,
        layout: &LevelLayout,
        seed: Option<u64>,
        environment: Box<dyn Environment>,
        navmesh: Box<dyn NavMesh>,
    ) -> Result<Self, SimError> {
        let mut world = World::new();

        world.insert_resource(SimClock::new(tuning.simulation.max_dt));
        world.insert_resource(SimRng::new(seed));
        world.insert_resource(GameOutcome::default());
        world.insert_resource(EventLog::new());
        world.insert_resource(Outbox::new());
        world.insert_resource(SnapshotGenerator::default());
        world.insert_resource(SceneGeometry(environment));
        world.insert_resource(NavLink(navmesh));

        world.insert_resource(WhisperQueue::default());
        world.insert_resource(HintQueue::default());
        world.insert_resource(WhisperEngine::from_tuning(&tuning.dialogue.whispers));
        world.insert_resource(HintEngine::from_tuning(&tuning.dialogue));
        world.insert_resource(VoiceArbiter::new());
        world.insert_resource(layout.clips.to_bank());
        world.insert_resource(NarrationSchedule::new(layout.narration.clone()));
        if tuning.flashlight.enabled {
            world.insert_resource(Flashlight::new(tuning.flashlight.clone()));
        }

        let summary = spawn_level(&mut world, layout, tuning)?;
        tracing::info!("Level '{}' spawned: {}", layout.name, summary);

        let agents = {
            let mut query = world.query::<(Entity, &crate::components::AgentId)>();
            query.iter(&world).map(|(e, id)| (id.0.clone(), e)).collect()
        };

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                advance_voice,
                update_flashlight,
                detect_trigger_entries,
                update_agents,
                move_agents,
                process_whispers,
                process_hints,
                fire_narration_cues,
            )
                .chain()
                .distributive_run_if(level_running),
        );

        world.insert_resource(PlayerPose::standing(layout.player_start()));

        Ok(Self {
            world,
            schedule,
            agents,
            summary,
        })
    }

    pub fn summary(&self) -> &SpawnSummary {
        &self.summary
    }

    /// Advance one frame. Does nothing once the level has ended.
    pub fn tick(&mut self, dt: f32) {
        if !self.is_running() {
            return;
        }
        self.world.resource_mut::<SimClock>().advance(dt);
        self.schedule.run(&mut self.world);
    }

    pub fn is_running(&self) -> bool {
        self.world.resource::<GameOutcome>().is_running()
    }

    pub fn outcome(&self) -> &Outcome {
        &self.world.resource::<GameOutcome>().0
    }

    pub fn elapsed(&self) -> f64 {
        self.world.resource::<SimClock>().elapsed
    }

    pub fn tick_count(&self) -> u64 {
        self.world.resource::<SimClock>().tick
    }

    pub fn player(&self) -> Option<&PlayerPose> {
        self.world.get_resource::<PlayerPose>()
    }

    pub fn set_player(&mut self, pose: PlayerPose) {
        self.world.insert_resource(pose);
    }

    /// Agents fall back to patrolling while no player is reported
    pub fn clear_player(&mut self) {
        self.world.remove_resource::<PlayerPose>();
    }

    /// A host light source struck this agent during the coming tick
    pub fn hit_by_light(&mut self, agent_id: &str) -> Result<(), SimError> {
        let entity = self.entity(agent_id)?;
        if let Some(mut lit) = self.world.get_mut::<Illuminated>(entity) {
            lit.0 = true;
        }
        Ok(())
    }

    /// The player crossed into an intersection the host tracks itself
    pub fn intersection_entered(&mut self, marker_id: &str, available: &[Direction], correct: Direction) {
        if !self.is_running() {
            return;
        }
        self.world.resource_mut::<HintQueue>().push(MarkerContact {
            marker_id: marker_id.to_string(),
            available: available.to_vec(),
            correct,
        });
    }

    /// Returns whether the light is on afterwards
    pub fn toggle_flashlight(&mut self) -> bool {
        self.world
            .get_resource_mut::<Flashlight>()
            .map_or(false, |mut light| light.toggle())
    }

    pub fn flashlight(&self) -> Option<&Flashlight> {
        self.world.get_resource::<Flashlight>()
    }

    pub fn set_environment(&mut self, environment: Box<dyn Environment>) {
        self.world.insert_resource(SceneGeometry(environment));
    }

    /// Without an environment nothing blocks sight or light
    pub fn clear_environment(&mut self) {
        self.world.remove_resource::<SceneGeometry>();
    }

    pub fn set_navmesh(&mut self, navmesh: Box<dyn NavMesh>) {
        self.world.insert_resource(NavLink(navmesh));
    }

    /// Without a navmesh agents keep their current destination
    pub fn clear_navmesh(&mut self) {
        self.world.remove_resource::<NavLink>();
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    pub fn agent_state(&self, agent_id: &str) -> Option<BehaviorState> {
        self.component::<Behavior>(agent_id).map(Behavior::state)
    }

    pub fn visual_state(&self, agent_id: &str) -> Option<VisualState> {
        self.component::<Behavior>(agent_id).map(Behavior::visual)
    }

    pub fn agent_position(&self, agent_id: &str) -> Option<Vec3> {
        self.component::<Position>(agent_id).map(|p| p.0)
    }

    pub fn exposure(&self, agent_id: &str) -> Option<f32> {
        self.component::<ExposureGauge>(agent_id).map(ExposureGauge::level)
    }

    /// Teleport an agent, e.g. when the host resolves a cutscene
    pub fn place_agent(&mut self, agent_id: &str, position: Vec3) -> Result<(), SimError> {
        let entity = self.entity(agent_id)?;
        if let Some(mut p) = self.world.get_mut::<Position>(entity) {
            p.0 = position;
        }
        Ok(())
    }

    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        self.world.resource_mut::<Outbox>().drain()
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.resource_mut::<EventLog>().drain()
    }

    pub fn snapshot(&mut self) -> LevelSnapshot {
        generate_snapshot(&mut self.world)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn entity(&self, agent_id: &str) -> Result<Entity, SimError> {
        self.agents
            .get(agent_id)
            .copied()
            .ok_or_else(|| SimError::UnknownAgent(agent_id.to_string()))
    }

    fn component<T: Component>(&self, agent_id: &str) -> Option<&T> {
        let entity = self.agents.get(agent_id)?;
        self.world.get::<T>(*entity)
    }
}
