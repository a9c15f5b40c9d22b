//! Voice
//!
//! One shared voice channel contested by narration, monster whispers and
//! path hints, plus the scheduled narration lines.

pub mod arbiter;
pub mod narration;

pub use arbiter::{ActiveVoice, Arbitration, VoiceArbiter};
pub use narration::{fire_narration_cues, NarrationCue, NarrationSchedule};

use bevy_ecs::prelude::*;
use stalker_events::{ChannelClass, EventPayload, VoiceOutput};

use crate::components::SimClock;
use crate::dialogue::Clip;
use crate::events::EventLog;
use crate::output::{HostCommand, Outbox};

/// Ask the arbiter for the channel and tell the host what changed.
/// Returns whether the clip is now playing.
pub fn speak(
    arbiter: &mut VoiceArbiter,
    outbox: &mut Outbox,
    log: &mut EventLog,
    clock: &SimClock,
    channel: ChannelClass,
    clip: &Clip,
    is_lie: bool,
) -> bool {
    match arbiter.request(channel, clip, is_lie) {
        Arbitration::Accepted { preempted } => {
            if let Some(previous) = &preempted {
                outbox.push(HostCommand::StopAudio {
                    channel: previous.channel,
                    output: previous.output,
                });
            }
            let output = VoiceOutput::for_lie(is_lie);
            outbox.push(HostCommand::PlayAudio {
                channel,
                output,
                clip: clip.name.clone(),
            });
            tracing::debug!("Voice {} playing {} ({:?})", channel.as_str(), clip.name, output);
            log.record(
                clock,
                EventPayload::VoiceAccepted {
                    channel,
                    output,
                    clip: clip.name.clone(),
                    preempted: preempted.map(|p| p.clip),
                },
            );
            true
        }
        Arbitration::Rejected { active } => {
            tracing::debug!(
                "Voice {} dropped {}: {} is speaking",
                channel.as_str(),
                clip.name,
                active.as_str()
            );
            log.record(
                clock,
                EventPayload::VoiceRejected {
                    channel,
                    clip: clip.name.clone(),
                    active,
                },
            );
            false
        }
    }
}

/// System: run the active clip down and free the channel when it ends
pub fn advance_voice(clock: Res<SimClock>, mut arbiter: ResMut<VoiceArbiter>, mut log: ResMut<EventLog>) {
    if let Some(finished) = arbiter.tick(clock.dt) {
        log.record(
            &clock,
            EventPayload::VoiceFinished {
                channel: finished.channel,
                clip: finished.clip,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speak_reports_preemption() {
        let mut arbiter = VoiceArbiter::new();
        let mut outbox = Outbox::new();
        let mut log = EventLog::new();
        let clock = SimClock::default();

        let hint = Clip::new("hint_left_truth_01", 2.0);
        let whisper = Clip::new("listener_lie_01", 3.0);

        assert!(speak(&mut arbiter, &mut outbox, &mut log, &clock, ChannelClass::PathHint, &hint, false));
        assert!(speak(&mut arbiter, &mut outbox, &mut log, &clock, ChannelClass::MonsterWhisper, &whisper, true));
        assert!(!speak(&mut arbiter, &mut outbox, &mut log, &clock, ChannelClass::PathHint, &hint, false));

        let commands = outbox.drain();
        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[1],
            HostCommand::StopAudio {
                channel: ChannelClass::PathHint,
                output: VoiceOutput::Clean,
            }
        );
        assert_eq!(
            commands[2],
            HostCommand::PlayAudio {
                channel: ChannelClass::MonsterWhisper,
                output: VoiceOutput::Distorted,
                clip: "listener_lie_01".to_string(),
            }
        );

        let events = log.drain();
        assert!(matches!(
            &events[1].payload,
            EventPayload::VoiceAccepted { preempted: Some(clip), .. } if clip == "hint_left_truth_01"
        ));
        assert!(matches!(events[2].payload, EventPayload::VoiceRejected { .. }));
    }
}
