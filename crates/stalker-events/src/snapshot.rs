//! Snapshot Types
//!
//! Point-in-time views of a running level, for renderers, tooling and debugging.

use serde::{Deserialize, Serialize};

use crate::types::{AgentKind, BehaviorState, ChannelClass, Outcome, VisualState, VoiceOutput};

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// Agent snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent_id: String,
    pub kind: AgentKind,
    pub state: BehaviorState,
    pub visual: VisualState,
    pub position: [f32; 3],
    /// Accumulated exposure in seconds
    pub exposure: f32,
    /// Exposure as a fraction of the threshold (0.0 to 1.0)
    pub exposure_fraction: f32,
    #[serde(default)]
    pub has_whispered: bool,
}

/// What the voice channel is doing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VoiceSnapshot {
    /// 0 when idle
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<VoiceOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<String>,
    #[serde(default)]
    pub remaining: f32,
}

/// Flashlight battery state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashlightSnapshot {
    pub on: bool,
    pub battery: f32,
    pub depleted: bool,
}

/// Full level snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub snapshot_id: String,
    pub tick: u64,
    pub time: f64,
    pub outcome: Outcome,
    pub agents: Vec<AgentSnapshot>,
    #[serde(default)]
    pub voice: VoiceSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flashlight: Option<FlashlightSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumed_markers: Vec<String>,
}

impl LevelSnapshot {
    pub fn agent(&self, agent_id: &str) -> Option<&AgentSnapshot> {
        self.agents.iter().find(|a| a.agent_id == agent_id)
    }

    /// Agents currently in a given behavior state
    pub fn agents_in(&self, state: BehaviorState) -> impl Iterator<Item = &AgentSnapshot> {
        self.agents.iter().filter(move |a| a.state == state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LevelSnapshot {
        LevelSnapshot {
            snapshot_id: generate_snapshot_id(1),
            tick: 60,
            time: 1.0,
            outcome: Outcome::Running,
            agents: vec![
                AgentSnapshot {
                    agent_id: "listener_01".to_string(),
                    kind: AgentKind::Listener,
                    state: BehaviorState::Chasing,
                    visual: VisualState::Aggro,
                    position: [1.0, 0.0, 2.0],
                    exposure: 0.5,
                    exposure_fraction: 0.33,
                    has_whispered: true,
                },
                AgentSnapshot {
                    agent_id: "shader_01".to_string(),
                    kind: AgentKind::Shader,
                    state: BehaviorState::Patrol,
                    visual: VisualState::Idle,
                    position: [9.0, 0.0, 9.0],
                    exposure: 0.0,
                    exposure_fraction: 0.0,
                    has_whispered: false,
                },
            ],
            voice: VoiceSnapshot::default(),
            flashlight: None,
            consumed_markers: vec![],
        }
    }

    #[test]
    fn test_snapshot_id_format() {
        assert_eq!(generate_snapshot_id(7), "snap_000007");
    }

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = sample();
        assert_eq!(snapshot.agent("shader_01").map(|a| a.kind), Some(AgentKind::Shader));
        assert!(snapshot.agent("nobody").is_none());
        assert_eq!(snapshot.agents_in(BehaviorState::Chasing).count(), 1);
    }

    #[test]
    fn test_snapshot_json_skips_empty() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("consumed_markers"));
        assert!(!json.contains("flashlight"));
        let parsed: LevelSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.agents.len(), 2);
    }
}
