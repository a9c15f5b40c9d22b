//! Level Layout
//!
//! Designer-authored description of a level: agents, intersection markers,
//! hazards, the exit, sight-blocking obstacles and the audio manifest.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use stalker_events::{AgentKind, Direction};

use crate::components::{
    Agent, AgentId, Behavior, BehaviorPolicy, Illuminated, ListenerPolicy, Navigator, Policy, Position, Senses,
    ShaderPolicy, Warning,
};
use crate::config::Tuning;
use crate::dialogue::{Clip, ClipBank, IntersectionMarker};
use crate::geometry::{Aabb, BoxScene, ColliderId, FlatNavMesh, Layers};
use crate::systems::{ExposureGauge, Hazard, LevelExit, PatrolPlanner, TriggerVolume};
use crate::voice::NarrationCue;

fn default_true() -> bool {
    true
}

/// Walkable floor rectangle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorSpec {
    /// (x, z) corners
    pub min: [f32; 2],
    pub max: [f32; 2],
    #[serde(default)]
    pub y: f32,
}

impl Default for FloorSpec {
    fn default() -> Self {
        Self {
            min: [-50.0, -50.0],
            max: [50.0, 50.0],
            y: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpawn {
    pub id: String,
    pub kind: AgentKind,
    pub position: [f32; 3],
    /// Patrol center relative to the spawn point
    #[serde(default)]
    pub patrol_offset: [f32; 3],
    /// Overrides the tuned patrol rectangle size
    #[serde(default)]
    pub patrol_area: Option<[f32; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerSpawn {
    pub id: String,
    pub min: [f32; 3],
    pub max: [f32; 3],
    pub available: Vec<Direction>,
    pub correct: Direction,
    #[serde(default = "default_true")]
    pub one_shot: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardSpawn {
    pub id: String,
    pub min: [f32; 3],
    pub max: [f32; 3],
    pub cause: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitSpawn {
    pub id: String,
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// A solid box; blocks walking always, sight unless see-through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: String,
    pub min: [f32; 3],
    pub max: [f32; 3],
    #[serde(default = "default_true")]
    pub blocks_sight: bool,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(Vec3::from(self.min), Vec3::from(self.max))
    }

    pub fn layers(&self) -> Layers {
        if self.blocks_sight {
            Layers::ENVIRONMENT
        } else {
            Layers::TRANSPARENT
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintClip {
    pub direction: Direction,
    pub truthful: bool,
    pub name: String,
    pub duration: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperClip {
    pub kind: AgentKind,
    pub truthful: bool,
    pub name: String,
    pub duration: f32,
}

/// Every clip the level may play
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClipManifest {
    #[serde(default)]
    pub hints: Vec<HintClip>,
    #[serde(default)]
    pub whispers: Vec<WhisperClip>,
    #[serde(default)]
    pub narration: Vec<Clip>,
}

impl ClipManifest {
    pub fn to_bank(&self) -> ClipBank {
        let mut bank = ClipBank::new();
        for hint in &self.hints {
            bank.add_hint(hint.direction, hint.truthful, Clip::new(&hint.name, hint.duration));
        }
        for whisper in &self.whispers {
            bank.add_whisper(whisper.kind, whisper.truthful, Clip::new(&whisper.name, whisper.duration));
        }
        for clip in &self.narration {
            bank.add_narration(clip.clone());
        }
        bank
    }
}

/// A whole level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLayout {
    pub name: String,
    #[serde(default)]
    pub floor: FloorSpec,
    #[serde(default)]
    pub player_start: [f32; 3],
    #[serde(default)]
    pub agents: Vec<AgentSpawn>,
    #[serde(default)]
    pub markers: Vec<MarkerSpawn>,
    #[serde(default)]
    pub hazards: Vec<HazardSpawn>,
    #[serde(default)]
    pub exits: Vec<ExitSpawn>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub clips: ClipManifest,
    #[serde(default)]
    pub narration: Vec<NarrationCue>,
}

/// Level loading error type
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Level parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate id `{0}` in level layout")]
    DuplicateId(String),
    #[error("Floor of level `{0}` has no area")]
    EmptyFloor(String),
}

impl LevelLayout {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            floor: FloorSpec::default(),
            player_start: [0.0; 3],
            agents: Vec::new(),
            markers: Vec::new(),
            hazards: Vec::new(),
            exits: Vec::new(),
            obstacles: Vec::new(),
            clips: ClipManifest::default(),
            narration: Vec::new(),
        }
    }

    /// Load a layout from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, LevelError> {
        let layout: Self = serde_json::from_str(content)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Ids are unique across every kind of placed object
    pub fn validate(&self) -> Result<(), LevelError> {
        let floor = &self.floor;
        if floor.min[0] == floor.max[0] || floor.min[1] == floor.max[1] {
            return Err(LevelError::EmptyFloor(self.name.clone()));
        }

        let mut seen = HashSet::new();
        let ids = self
            .agents
            .iter()
            .map(|a| &a.id)
            .chain(self.markers.iter().map(|m| &m.id))
            .chain(self.hazards.iter().map(|h| &h.id))
            .chain(self.exits.iter().map(|e| &e.id))
            .chain(self.obstacles.iter().map(|o| &o.id));
        for id in ids {
            if !seen.insert(id.as_str()) {
                return Err(LevelError::DuplicateId(id.clone()));
            }
        }
        Ok(())
    }

    pub fn player_start(&self) -> Vec3 {
        Vec3::from(self.player_start)
    }
}

/// Static geometry for sight and light rays
pub fn build_scene(layout: &LevelLayout) -> BoxScene {
    let mut scene = BoxScene::new();
    for (i, obstacle) in layout.obstacles.iter().enumerate() {
        scene.add(ColliderId(i as u32 + 1), obstacle.bounds(), obstacle.layers());
    }
    scene
}

/// Walkable floor minus obstacle footprints
pub fn build_navmesh(layout: &LevelLayout) -> FlatNavMesh {
    let floor = &layout.floor;
    let mut nav = FlatNavMesh::new(Vec2::from(floor.min), Vec2::from(floor.max), floor.y);
    for obstacle in &layout.obstacles {
        nav.block(obstacle.bounds());
    }
    nav
}

/// Spawn one agent with every component its state machine needs
pub fn spawn_agent(world: &mut World, spawn: &AgentSpawn, tuning: &Tuning) -> Entity {
    let position = Vec3::from(spawn.position);
    let home = position + Vec3::from(spawn.patrol_offset);
    let planner = PatrolPlanner::from_tuning(home, spawn.patrol_area, &tuning.patrol);
    let stopping = tuning.patrol.stopping_distance;

    let (senses, policy, gauge, navigator) = match spawn.kind {
        AgentKind::Listener => {
            let t = &tuning.listener;
            (
                Senses::for_listener(t),
                BehaviorPolicy::Listener(ListenerPolicy::from_tuning(t)),
                ExposureGauge::new(t.required_light_time, t.decay_cooldown),
                Navigator::new(t.wander_speed, stopping),
            )
        }
        AgentKind::Shader => {
            let t = &tuning.shader;
            (
                Senses::for_shader(t),
                BehaviorPolicy::Shader(ShaderPolicy::from_tuning(t)),
                ExposureGauge::new(t.required_light_time, t.decay_cooldown),
                Navigator::new(t.patrol_speed, stopping),
            )
        }
    };

    world
        .spawn((
            Agent,
            AgentId(spawn.id.clone()),
            Position(position),
            senses,
            Policy(policy),
            Behavior::new(),
            gauge,
            planner,
            navigator,
            Warning::default(),
            Illuminated::default(),
        ))
        .id()
}

/// Spawn markers, hazards and exits as trigger volumes
pub fn spawn_triggers(world: &mut World, layout: &LevelLayout) -> usize {
    let mut count = 0;
    for marker in &layout.markers {
        let mut component = IntersectionMarker::new(&marker.id, marker.available.clone(), marker.correct);
        component.one_shot = marker.one_shot;
        world.spawn((volume(marker.min, marker.max), component));
        count += 1;
    }
    for hazard in &layout.hazards {
        world.spawn((
            volume(hazard.min, hazard.max),
            Hazard {
                cause: hazard.cause.clone(),
            },
        ));
        count += 1;
    }
    for exit in &layout.exits {
        world.spawn((volume(exit.min, exit.max), LevelExit));
        count += 1;
    }
    count
}

fn volume(min: [f32; 3], max: [f32; 3]) -> TriggerVolume {
    TriggerVolume::new(Aabb::new(Vec3::from(min), Vec3::from(max)))
}

/// Summary of a spawned level
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSummary {
    pub listeners: usize,
    pub shaders: usize,
    pub triggers: usize,
}

impl std::fmt::Display for SpawnSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} listeners, {} shaders, {} triggers",
            self.listeners, self.shaders, self.triggers
        )
    }
}

/// Spawn every agent and trigger of a validated layout
pub fn spawn_level(world: &mut World, layout: &LevelLayout, tuning: &Tuning) -> Result<SpawnSummary, LevelError> {
    layout.validate()?;

    let mut summary = SpawnSummary {
        listeners: 0,
        shaders: 0,
        triggers: 0,
    };
    for spawn in &layout.agents {
        spawn_agent(world, spawn, tuning);
        match spawn.kind {
            AgentKind::Listener => summary.listeners += 1,
            AgentKind::Shader => summary.shaders += 1,
        }
    }
    summary.triggers = spawn_triggers(world, layout);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Environment, NavMesh};

    fn small_level() -> LevelLayout {
        let mut layout = LevelLayout::empty("test");
        layout.agents.push(AgentSpawn {
            id: "listener_01".to_string(),
            kind: AgentKind::Listener,
            position: [0.0, 0.0, 5.0],
            patrol_offset: [0.0; 3],
            patrol_area: None,
        });
        layout.obstacles.push(Obstacle {
            id: "wall".to_string(),
            min: [2.0, 0.0, -1.0],
            max: [3.0, 3.0, 1.0],
            blocks_sight: true,
        });
        layout.obstacles.push(Obstacle {
            id: "bars".to_string(),
            min: [-3.0, 0.0, -1.0],
            max: [-2.0, 3.0, 1.0],
            blocks_sight: false,
        });
        layout
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut layout = small_level();
        layout.exits.push(ExitSpawn {
            id: "wall".to_string(),
            min: [0.0; 3],
            max: [1.0; 3],
        });
        assert!(matches!(layout.validate(), Err(LevelError::DuplicateId(id)) if id == "wall"));
    }

    #[test]
    fn test_json_defaults() {
        let layout = LevelLayout::from_json(
            r#"{
                "name": "tiny",
                "agents": [{"id": "s1", "kind": "shader", "position": [1.0, 0.0, 1.0]}],
                "markers": [{"id": "m1", "min": [0,0,0], "max": [1,1,1],
                             "available": ["left", "right"], "correct": "right"}]
            }"#,
        )
        .unwrap();
        assert!(layout.markers[0].one_shot);
        assert_eq!(layout.agents[0].patrol_area, None);
        assert_eq!(layout.floor.max, [50.0, 50.0]);
    }

    #[test]
    fn test_scene_respects_see_through_obstacles() {
        let scene = build_scene(&small_level());
        let origin = Vec3::new(0.0, 1.0, 0.0);
        assert!(scene.raycast(origin, Vec3::X, 10.0, Layers::ENVIRONMENT).is_some());
        assert!(scene.raycast(origin, Vec3::NEG_X, 10.0, Layers::ENVIRONMENT).is_none());

        let nav = build_navmesh(&small_level());
        assert!(!nav.is_walkable(Vec3::new(-2.5, 0.0, 0.0)));
        assert!(nav.sample_point(Vec3::new(10.0, 0.0, 10.0), 1.0).is_some());
    }

    #[test]
    fn test_spawn_level_counts() {
        let mut world = World::new();
        let mut layout = small_level();
        layout.hazards.push(HazardSpawn {
            id: "pit".to_string(),
            min: [5.0, -1.0, 5.0],
            max: [6.0, 1.0, 6.0],
            cause: "fell".to_string(),
        });
        let summary = spawn_level(&mut world, &layout, &Tuning::default()).unwrap();
        assert_eq!(
            summary,
            SpawnSummary {
                listeners: 1,
                shaders: 0,
                triggers: 1
            }
        );

        let mut agents = world.query::<(&AgentId, &Policy, &PatrolPlanner)>();
        let (id, policy, planner) = agents.single(&world);
        assert_eq!(id.as_str(), "listener_01");
        assert_eq!(policy.kind(), AgentKind::Listener);
        assert_eq!(planner.home, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_manifest_builds_bank() {
        let manifest = ClipManifest {
            hints: vec![HintClip {
                direction: Direction::Left,
                truthful: false,
                name: "left_lie".to_string(),
                duration: 1.5,
            }],
            whispers: vec![],
            narration: vec![Clip::new("intro", 6.0)],
        };
        let bank = manifest.to_bank();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.narration("intro").map(|c| c.duration), Some(6.0));
    }
}
