//! Event Types
//!
//! Every observable decision the simulation makes is recorded as a `SimEvent`.

use serde::{Deserialize, Serialize};

use crate::types::{AgentKind, BehaviorState, ChannelClass, Direction, Verdict, VoiceOutput};

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// An agent moved between behavior states
    StateChanged {
        agent_id: String,
        kind: AgentKind,
        from: BehaviorState,
        to: BehaviorState,
    },
    /// An agent's exposure gauge crossed its threshold
    LightThreshold { agent_id: String, kind: AgentKind },
    /// An agent's one-time proximity warning
    Whisper {
        agent_id: String,
        kind: AgentKind,
        verdict: Verdict,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        clip: Option<String>,
    },
    /// The narrator reacted to an intersection
    PathHint {
        marker_id: String,
        correct: Direction,
        verdict: Verdict,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        announced: Option<Direction>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        clip: Option<String>,
    },
    /// A dialogue request arrived while its engine was cooling down
    DialogueCooldown {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        marker_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agent_id: Option<String>,
    },
    /// A one-shot intersection marker deactivated
    MarkerConsumed { marker_id: String },
    VoiceAccepted {
        channel: ChannelClass,
        output: VoiceOutput,
        clip: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preempted: Option<String>,
    },
    VoiceRejected {
        channel: ChannelClass,
        clip: String,
        active: ChannelClass,
    },
    VoiceFinished { channel: ChannelClass, clip: String },
    /// A scheduled narration line came due
    NarrationCue { clip: String },
    FlashlightDepleted,
    FlashlightRecovered,
    GameOver {
        cause: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agent_id: Option<String>,
    },
    LevelCleared,
}

/// A single logged event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    pub event_id: String,
    pub tick: u64,
    /// Simulation time in seconds at which the event happened
    pub time: f64,
    pub payload: EventPayload,
}

impl SimEvent {
    pub fn new(event_id: impl Into<String>, tick: u64, time: f64, payload: EventPayload) -> Self {
        Self {
            event_id: event_id.into(),
            tick,
            time,
            payload,
        }
    }

    /// The agent this event is about, if any
    pub fn agent_id(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::StateChanged { agent_id, .. }
            | EventPayload::LightThreshold { agent_id, .. }
            | EventPayload::Whisper { agent_id, .. } => Some(agent_id),
            EventPayload::DialogueCooldown { agent_id, .. } | EventPayload::GameOver { agent_id, .. } => {
                agent_id.as_deref()
            }
            _ => None,
        }
    }

    pub fn involves_agent(&self, agent_id: &str) -> bool {
        self.agent_id() == Some(agent_id)
    }

    /// Serialize to a single JSONL line
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from a single JSONL line
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}
