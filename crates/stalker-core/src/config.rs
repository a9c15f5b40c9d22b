//! Configuration System
//!
//! Loads tuning parameters from tuning.toml for easy adjustment without recompiling.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub simulation: SimulationTuning,
    pub listener: ListenerTuning,
    pub shader: ShaderTuning,
    pub patrol: PatrolTuning,
    pub dialogue: DialogueTuning,
    pub flashlight: FlashlightTuning,
}

/// Simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationTuning {
    /// Frame delta used by the CLI runner
    pub default_dt: f32,
    /// Largest delta a single tick may advance
    pub max_dt: f32,
    pub default_duration: f32,
}

impl Default for SimulationTuning {
    fn default() -> Self {
        Self {
            default_dt: 1.0 / 60.0,
            max_dt: 0.1,
            default_duration: 90.0,
        }
    }
}

/// Listener-class agents: hunt by line of sight, stunned by light
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerTuning {
    pub warning_radius: f32,
    pub detection_radius: f32,
    pub catch_radius: f32,
    pub eye_height: f32,
    pub wander_speed: f32,
    pub chase_speed: f32,
    pub required_light_time: f32,
    pub stun_duration: f32,
    /// Grace window before accumulated exposure starts draining
    pub decay_cooldown: f32,
}

impl Default for ListenerTuning {
    fn default() -> Self {
        Self {
            warning_radius: 20.0,
            detection_radius: 10.0,
            catch_radius: 1.2,
            eye_height: 1.0,
            wander_speed: 2.0,
            chase_speed: 6.0,
            required_light_time: 1.5,
            stun_duration: 3.0,
            decay_cooldown: 0.5,
        }
    }
}

/// Which radius ends a shader's pursuit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeaggroBoundary {
    #[default]
    Detection,
    Warning,
}

/// Shader-class agents: hover around the player, enraged by light
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderTuning {
    pub warning_radius: f32,
    pub detection_radius: f32,
    pub catch_radius: f32,
    pub eye_height: f32,
    pub hover_radius: f32,
    pub hover_speed: f32,
    pub hover_interval_min: f32,
    pub hover_interval_max: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    pub required_light_time: f32,
    pub decay_cooldown: f32,
    pub deaggro_boundary: DeaggroBoundary,
}

impl ShaderTuning {
    pub fn deaggro_radius(&self) -> f32 {
        match self.deaggro_boundary {
            DeaggroBoundary::Detection => self.detection_radius,
            DeaggroBoundary::Warning => self.warning_radius,
        }
    }
}

impl Default for ShaderTuning {
    fn default() -> Self {
        Self {
            warning_radius: 20.0,
            detection_radius: 8.0,
            catch_radius: 1.2,
            eye_height: 1.0,
            hover_radius: 4.0,
            hover_speed: 3.5,
            hover_interval_min: 1.0,
            hover_interval_max: 2.5,
            patrol_speed: 2.0,
            chase_speed: 7.0,
            required_light_time: 2.0,
            decay_cooldown: 0.5,
            deaggro_boundary: DeaggroBoundary::Detection,
        }
    }
}

/// Wander behavior shared by all agents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolTuning {
    /// Full width (x) and depth (z) of the patrol rectangle
    pub area_size: [f32; 2],
    pub min_wait: f32,
    pub max_wait: f32,
    /// How far from a sampled point the navmesh may snap
    pub nav_search_radius: f32,
    pub stopping_distance: f32,
}

impl Default for PatrolTuning {
    fn default() -> Self {
        Self {
            area_size: [10.0, 10.0],
            min_wait: 2.0,
            max_wait: 5.0,
            nav_search_radius: 5.0,
            stopping_distance: 0.5,
        }
    }
}

/// Cooldown and odds for one dialogue engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineTuning {
    pub cooldown: f32,
    /// First utterance ever is a coin flip between truth and lie
    pub first_encounter_even_odds: bool,
}

/// Narrator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueTuning {
    pub hints: EngineTuning,
    pub whispers: EngineTuning,
    /// Intersection markers ignore the hint cooldown
    pub markers_bypass_cooldown: bool,
}

impl Default for DialogueTuning {
    fn default() -> Self {
        Self {
            hints: EngineTuning {
                cooldown: 10.0,
                first_encounter_even_odds: true,
            },
            whispers: EngineTuning {
                cooldown: 5.0,
                first_encounter_even_odds: true,
            },
            markers_bypass_cooldown: false,
        }
    }
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            cooldown: 10.0,
            first_encounter_even_odds: true,
        }
    }
}

/// Player flashlight battery and beam
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashlightTuning {
    pub enabled: bool,
    pub max_battery: f32,
    pub drain_rate: f32,
    pub recharge_rate: f32,
    /// Battery level at which a depleted light becomes usable again
    pub recovery_threshold: f32,
    pub light_range: f32,
    /// Agents are lit as spheres of this radius
    pub agent_hit_radius: f32,
    pub agent_center_height: f32,
}

impl Default for FlashlightTuning {
    fn default() -> Self {
        Self {
            enabled: true,
            max_battery: 100.0,
            drain_rate: 5.0,
            recharge_rate: 5.0,
            recovery_threshold: 30.0,
            light_range: 15.0,
            agent_hit_radius: 0.75,
            agent_center_height: 1.0,
        }
    }
}

impl Tuning {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a path, or use defaults if it cannot be read
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", path.display(), e);
            Self::default()
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
