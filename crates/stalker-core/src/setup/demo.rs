//! Demo Level
//!
//! A single corridor with two forks, one listener, one shader, a pit and an
//! exit. Used by the CLI runner and integration tests.

use stalker_events::{AgentKind, Direction};

use super::level::*;
use crate::dialogue::Clip;
use crate::voice::NarrationCue;

fn hint(direction: Direction, truthful: bool, duration: f32) -> HintClip {
    let suffix = if truthful { "truth" } else { "lie" };
    HintClip {
        direction,
        truthful,
        name: format!("hint_{}_{}", direction.as_str(), suffix),
        duration,
    }
}

fn whisper(kind: AgentKind, truthful: bool, name: &str, duration: f32) -> WhisperClip {
    WhisperClip {
        kind,
        truthful,
        name: name.to_string(),
        duration,
    }
}

/// The bundled demo level
pub fn demo_level() -> LevelLayout {
    let mut hints = Vec::new();
    for &direction in Direction::all() {
        hints.push(hint(direction, true, 2.5));
        hints.push(hint(direction, false, 2.5));
    }

    LevelLayout {
        name: "corridor".to_string(),
        floor: FloorSpec {
            min: [-15.0, -5.0],
            max: [15.0, 65.0],
            y: 0.0,
        },
        player_start: [0.0, 0.0, 0.0],
        agents: vec![
            AgentSpawn {
                id: "listener_01".to_string(),
                kind: AgentKind::Listener,
                position: [-8.0, 0.0, 24.0],
                patrol_offset: [0.0; 3],
                patrol_area: Some([8.0, 8.0]),
            },
            AgentSpawn {
                id: "shader_01".to_string(),
                kind: AgentKind::Shader,
                position: [6.0, 0.0, 42.0],
                patrol_offset: [0.0; 3],
                patrol_area: Some([10.0, 10.0]),
            },
        ],
        markers: vec![
            MarkerSpawn {
                id: "fork_01".to_string(),
                min: [-3.0, 0.0, 10.0],
                max: [3.0, 2.0, 14.0],
                available: vec![Direction::Left, Direction::Right],
                correct: Direction::Left,
                one_shot: true,
            },
            MarkerSpawn {
                id: "fork_02".to_string(),
                min: [-3.0, 0.0, 31.0],
                max: [3.0, 2.0, 35.0],
                available: vec![Direction::Left, Direction::Center, Direction::Right],
                correct: Direction::Center,
                one_shot: true,
            },
        ],
        hazards: vec![HazardSpawn {
            id: "pit_01".to_string(),
            min: [8.0, -1.0, 26.0],
            max: [15.0, 1.0, 30.0],
            cause: "fell into the pit".to_string(),
        }],
        exits: vec![ExitSpawn {
            id: "exit".to_string(),
            min: [-3.0, 0.0, 56.0],
            max: [3.0, 3.0, 60.0],
        }],
        obstacles: vec![
            Obstacle {
                id: "pillar_01".to_string(),
                min: [-2.0, 0.0, 20.0],
                max: [2.0, 3.0, 22.0],
                blocks_sight: true,
            },
            Obstacle {
                id: "grate_01".to_string(),
                min: [3.0, 0.0, 38.0],
                max: [4.0, 3.0, 46.0],
                blocks_sight: false,
            },
        ],
        clips: ClipManifest {
            hints,
            whispers: vec![
                whisper(AgentKind::Listener, true, "whisper_listener_near", 2.0),
                whisper(AgentKind::Listener, false, "whisper_listener_safe", 2.0),
                whisper(AgentKind::Shader, true, "whisper_shader_near", 2.0),
                whisper(AgentKind::Shader, false, "whisper_shader_safe", 2.0),
            ],
            narration: vec![Clip::new("intro", 6.0), Clip::new("midpoint", 4.0)],
        },
        narration: vec![NarrationCue::new("intro", 0.5), NarrationCue::new("midpoint", 30.0)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_level_is_valid() {
        let level = demo_level();
        assert!(level.validate().is_ok());
        assert_eq!(level.agents.len(), 2);
        assert_eq!(level.clips.hints.len(), 6);
    }

    #[test]
    fn test_demo_level_json_roundtrip() {
        let json = demo_level().to_json().unwrap();
        let parsed = LevelLayout::from_json(&json).unwrap();
        assert_eq!(parsed.markers[1].correct, Direction::Center);
        assert_eq!(parsed.narration.len(), 2);
    }
}
