//! Proximity Whispers
//!
//! Agents queue their one-time warning here; the whisper engine decides
//! whether it comes out honest, misleading or not at all.

use bevy_ecs::prelude::*;
use stalker_events::{AgentKind, ChannelClass, EventPayload, Verdict};

use super::{ClipBank, DialogueEngine, Utterance};
use crate::components::SimClock;
use crate::config::EngineTuning;
use crate::events::EventLog;
use crate::output::Outbox;
use crate::voice::{speak, VoiceArbiter};
use crate::SimRng;

/// An agent asking to whisper
#[derive(Debug, Clone, PartialEq)]
pub struct WhisperCall {
    pub agent_id: String,
    pub kind: AgentKind,
}

/// Resource: whispers requested this tick
#[derive(Resource, Debug, Default)]
pub struct WhisperQueue {
    calls: Vec<WhisperCall>,
}

impl WhisperQueue {
    pub fn push(&mut self, agent_id: impl Into<String>, kind: AgentKind) {
        self.calls.push(WhisperCall {
            agent_id: agent_id.into(),
            kind,
        });
    }

    pub fn drain(&mut self) -> Vec<WhisperCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

/// Resource: the monsters' shared whisper voice
#[derive(Resource, Debug, Clone)]
pub struct WhisperEngine(pub DialogueEngine);

impl WhisperEngine {
    pub fn from_tuning(tuning: &EngineTuning) -> Self {
        Self(DialogueEngine::from_tuning(tuning))
    }
}

/// System: roll each queued whisper and send it to the voice channel
pub fn process_whispers(
    clock: Res<SimClock>,
    bank: Res<ClipBank>,
    mut rng: ResMut<SimRng>,
    mut queue: ResMut<WhisperQueue>,
    mut whispers: ResMut<WhisperEngine>,
    mut arbiter: ResMut<VoiceArbiter>,
    mut outbox: ResMut<Outbox>,
    mut log: ResMut<EventLog>,
) {
    for call in queue.drain() {
        match whispers.0.proximity_warning(call.kind, clock.elapsed, &mut rng.0) {
            Utterance::CoolingDown => {
                tracing::debug!("Whisper from {} dropped: cooling down", call.agent_id);
                log.record(
                    &clock,
                    EventPayload::DialogueCooldown {
                        marker_id: None,
                        agent_id: Some(call.agent_id),
                    },
                );
            }
            Utterance::Silent => {
                tracing::info!("{} {} keeps quiet", call.kind, call.agent_id);
                log.record(
                    &clock,
                    EventPayload::Whisper {
                        agent_id: call.agent_id,
                        kind: call.kind,
                        verdict: Verdict::Silence,
                        clip: None,
                    },
                );
            }
            Utterance::Spoken(request) => {
                let verdict = if request.is_lie { Verdict::Lie } else { Verdict::Truth };
                tracing::info!("{} {} whispers ({:?})", call.kind, call.agent_id, verdict);

                let clip = bank.pick_whisper(call.kind, !request.is_lie, &mut rng.0).cloned();
                log.record(
                    &clock,
                    EventPayload::Whisper {
                        agent_id: call.agent_id,
                        kind: call.kind,
                        verdict,
                        clip: clip.as_ref().map(|c| c.name.clone()),
                    },
                );
                if let Some(clip) = clip {
                    speak(
                        &mut arbiter,
                        &mut outbox,
                        &mut log,
                        &clock,
                        ChannelClass::MonsterWhisper,
                        &clip,
                        request.is_lie,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::Clip;

    fn whisper_world() -> World {
        let mut world = World::new();
        let mut bank = ClipBank::new();
        for kind in [AgentKind::Listener, AgentKind::Shader] {
            bank.add_whisper(kind, true, Clip::new(format!("{}_truth", kind.as_str()), 2.0));
            bank.add_whisper(kind, false, Clip::new(format!("{}_lie", kind.as_str()), 2.0));
        }
        world.insert_resource(bank);
        world.insert_resource(SimClock::default());
        world.insert_resource(SimRng::new(Some(21)));
        world.insert_resource(WhisperQueue::default());
        world.insert_resource(WhisperEngine(DialogueEngine::new(5.0)));
        world.insert_resource(VoiceArbiter::new());
        world.insert_resource(Outbox::new());
        world.insert_resource(EventLog::new());
        world
    }

    #[test]
    fn test_second_whisper_in_same_tick_hits_cooldown() {
        let mut world = whisper_world();
        let mut schedule = Schedule::default();
        schedule.add_systems(process_whispers);

        world.resource_mut::<WhisperQueue>().push("listener_01", AgentKind::Listener);
        world.resource_mut::<WhisperQueue>().push("shader_01", AgentKind::Shader);
        schedule.run(&mut world);

        let events = world.resource_mut::<EventLog>().drain();
        assert!(events.iter().any(|e| matches!(
            &e.payload,
            EventPayload::Whisper { agent_id, verdict, clip: Some(_), .. }
                if agent_id == "listener_01" && *verdict != Verdict::Silence
        )));
        assert!(events.iter().any(|e| matches!(
            &e.payload,
            EventPayload::DialogueCooldown { agent_id: Some(id), .. } if id == "shader_01"
        )));
        assert_eq!(world.resource::<VoiceArbiter>().priority(), 2);
        assert!(world.resource::<WhisperQueue>().is_empty());
    }
}
