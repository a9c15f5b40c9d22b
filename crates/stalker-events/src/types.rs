//! Shared Vocabulary
//!
//! Small enums used both by the simulation and by anything reading its output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Antagonist archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Hunts by sound and line of sight, stunned by light
    Listener,
    /// Hovers around the player, enraged by light
    Shader,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Listener => "listener",
            AgentKind::Shader => "shader",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behavior state of a single agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorState {
    #[default]
    Patrol,
    /// Listener pursuing a visible, standing player
    Chasing,
    /// Listener frozen after too much light
    Stunned,
    /// Shader orbiting the player
    Hovering,
    /// Shader pursuing the player after too much light
    Aggroed,
    /// Player caught; terminal
    Caught,
}

impl BehaviorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BehaviorState::Caught)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorState::Patrol => "patrol",
            BehaviorState::Chasing => "chasing",
            BehaviorState::Stunned => "stunned",
            BehaviorState::Hovering => "hovering",
            BehaviorState::Aggroed => "aggroed",
            BehaviorState::Caught => "caught",
        }
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse feedback state for renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VisualState {
    #[default]
    Idle,
    Warning,
    Aggro,
    Stunned,
}

/// A branch the player can take at an intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Center,
}

impl Direction {
    pub fn all() -> &'static [Direction] {
        &[Direction::Left, Direction::Right, Direction::Center]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Center => "center",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the narrator decided to do with a single utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Truth,
    Lie,
    Silence,
}

impl Verdict {
    pub fn is_lie(&self) -> bool {
        matches!(self, Verdict::Lie)
    }

    pub fn is_silent(&self) -> bool {
        matches!(self, Verdict::Silence)
    }
}

/// Voice channel classes, lowest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelClass {
    PathHint,
    MonsterWhisper,
    Narration,
}

impl ChannelClass {
    /// Fixed priority rank; 0 is reserved for an idle channel
    pub fn priority(&self) -> u8 {
        match self {
            ChannelClass::PathHint => 1,
            ChannelClass::MonsterWhisper => 2,
            ChannelClass::Narration => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelClass::PathHint => "path_hint",
            ChannelClass::MonsterWhisper => "monster_whisper",
            ChannelClass::Narration => "narration",
        }
    }
}

impl fmt::Display for ChannelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-output of a channel class: lies are mixed through a distorted chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VoiceOutput {
    #[default]
    Clean,
    Distorted,
}

impl VoiceOutput {
    pub fn for_lie(is_lie: bool) -> Self {
        if is_lie {
            VoiceOutput::Distorted
        } else {
            VoiceOutput::Clean
        }
    }
}

/// How the level currently stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Running,
    GameOver { cause: String },
    Cleared,
}

impl Outcome {
    pub fn is_running(&self) -> bool {
        matches!(self, Outcome::Running)
    }
}
