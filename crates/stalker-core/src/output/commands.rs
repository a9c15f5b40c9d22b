//! Host Commands
//!
//! Side effects the simulation asks of its host, queued until drained.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use stalker_events::{ChannelClass, VoiceOutput};

/// A request for the host to act on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostCommand {
    /// Start a clip on a channel's clean or distorted output
    PlayAudio {
        channel: ChannelClass,
        output: VoiceOutput,
        clip: String,
    },
    /// Cut whatever a channel output is playing
    StopAudio {
        channel: ChannelClass,
        output: VoiceOutput,
    },
    /// Show the end screen; time is already frozen
    GameOver { cause: String },
    LevelCleared,
}

/// Resource: commands waiting for the host
#[derive(Resource, Debug, Default)]
pub struct Outbox {
    commands: Vec<HostCommand>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: HostCommand) {
        self.commands.push(command);
    }

    pub fn drain(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn peek(&self) -> &[HostCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbox_drains_in_order() {
        let mut outbox = Outbox::new();
        outbox.push(HostCommand::PlayAudio {
            channel: ChannelClass::PathHint,
            output: VoiceOutput::Distorted,
            clip: "hint_left_lie_01".to_string(),
        });
        outbox.push(HostCommand::GameOver {
            cause: "fell".to_string(),
        });

        let drained = outbox.drain();
        assert_eq!(drained.len(), 2);
        assert!(matches!(drained[1], HostCommand::GameOver { .. }));
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_command_json_shape() {
        let json = serde_json::to_string(&HostCommand::LevelCleared).unwrap();
        assert_eq!(json, r#"{"command":"level_cleared"}"#);
    }
}
