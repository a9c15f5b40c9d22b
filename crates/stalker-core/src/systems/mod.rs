//! ECS Systems
//!
//! Per-tick logic: light, triggers, agent state machines, movement.

pub mod behavior;
pub mod exposure;
pub mod flashlight;
pub mod listener;
pub mod movement;
pub mod outcome;
pub mod patrol;
pub mod shader;
pub mod triggers;

pub use behavior::{update_agents, AgentBody, Effects, StepContext};
pub use exposure::ExposureGauge;
pub use flashlight::{update_flashlight, Flashlight, FlashlightChange, FlashlightTick};
pub use listener::step_listener;
pub use movement::move_agents;
pub use outcome::{declare_game_over, declare_level_cleared};
pub use patrol::{pick_destination, PatrolPlanner};
pub use shader::step_shader;
pub use triggers::{detect_trigger_entries, Hazard, LevelExit, TriggerVolume};
