//! Path Hints
//!
//! Intersection markers hand their directions to the hint engine when the
//! player enters them.

use bevy_ecs::prelude::*;
use stalker_events::{ChannelClass, Direction, EventPayload, Verdict};

use super::{ClipBank, DialogueEngine, Utterance};
use crate::components::SimClock;
use crate::config::DialogueTuning;
use crate::events::EventLog;
use crate::output::Outbox;
use crate::voice::{speak, VoiceArbiter};
use crate::SimRng;

/// Component: a branching point in the level
#[derive(Component, Debug, Clone)]
pub struct IntersectionMarker {
    pub id: String,
    pub available: Vec<Direction>,
    pub correct: Direction,
    /// Deactivates after the first contact
    pub one_shot: bool,
    pub consumed: bool,
}

impl IntersectionMarker {
    pub fn new(id: impl Into<String>, available: Vec<Direction>, correct: Direction) -> Self {
        Self {
            id: id.into(),
            available,
            correct,
            one_shot: true,
            consumed: false,
        }
    }

    pub fn repeatable(mut self) -> Self {
        self.one_shot = false;
        self
    }

    pub fn is_active(&self) -> bool {
        !self.consumed
    }

    pub fn contact(&self) -> MarkerContact {
        MarkerContact {
            marker_id: self.id.clone(),
            available: self.available.clone(),
            correct: self.correct,
        }
    }
}

/// The player crossed a marker
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerContact {
    pub marker_id: String,
    pub available: Vec<Direction>,
    pub correct: Direction,
}

/// Resource: contacts waiting for the hint engine
#[derive(Resource, Debug, Default)]
pub struct HintQueue {
    contacts: Vec<MarkerContact>,
}

impl HintQueue {
    pub fn push(&mut self, contact: MarkerContact) {
        self.contacts.push(contact);
    }

    pub fn drain(&mut self) -> Vec<MarkerContact> {
        std::mem::take(&mut self.contacts)
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

/// Resource: the narrator's path-hint voice
#[derive(Resource, Debug, Clone)]
pub struct HintEngine {
    pub engine: DialogueEngine,
    /// Marker contacts skip the cooldown check
    pub bypass_cooldown: bool,
}

impl HintEngine {
    pub fn from_tuning(tuning: &DialogueTuning) -> Self {
        Self {
            engine: DialogueEngine::from_tuning(&tuning.hints),
            bypass_cooldown: tuning.markers_bypass_cooldown,
        }
    }
}

/// System: resolve queued marker contacts into path hints
#[allow(clippy::too_many_arguments)]
pub fn process_hints(
    clock: Res<SimClock>,
    bank: Res<ClipBank>,
    mut rng: ResMut<SimRng>,
    mut queue: ResMut<HintQueue>,
    mut hints: ResMut<HintEngine>,
    mut arbiter: ResMut<VoiceArbiter>,
    mut outbox: ResMut<Outbox>,
    mut log: ResMut<EventLog>,
    mut markers: Query<&mut IntersectionMarker>,
) {
    let now = clock.elapsed;

    for contact in queue.drain() {
        if let Some(mut marker) = markers.iter_mut().find(|m| m.id == contact.marker_id) {
            if marker.consumed {
                tracing::debug!("Marker {} already spent", marker.id);
                continue;
            }
            if marker.one_shot {
                marker.consumed = true;
                log.record(
                    &clock,
                    EventPayload::MarkerConsumed {
                        marker_id: marker.id.clone(),
                    },
                );
            }
        }

        let bypass = hints.bypass_cooldown;
        let utterance = hints
            .engine
            .on_intersection_entered(&contact.available, contact.correct, now, bypass, &mut rng.0);

        match utterance {
            Utterance::CoolingDown => {
                tracing::debug!("Hint at {} skipped: narrator cooling down", contact.marker_id);
                log.record(
                    &clock,
                    EventPayload::DialogueCooldown {
                        marker_id: Some(contact.marker_id),
                        agent_id: None,
                    },
                );
            }
            Utterance::Silent => {
                tracing::info!("Narrator stays silent at {}", contact.marker_id);
                log.record(
                    &clock,
                    EventPayload::PathHint {
                        marker_id: contact.marker_id,
                        correct: contact.correct,
                        verdict: Verdict::Silence,
                        announced: None,
                        clip: None,
                    },
                );
            }
            Utterance::Spoken(request) => {
                let verdict = if request.is_lie { Verdict::Lie } else { Verdict::Truth };
                tracing::info!(
                    "Narrator says {} at {} ({:?}, correct is {})",
                    request.announced.as_str(),
                    contact.marker_id,
                    verdict,
                    contact.correct.as_str()
                );

                let clip = bank.pick_hint(request.announced, !request.is_lie, &mut rng.0).cloned();
                log.record(
                    &clock,
                    EventPayload::PathHint {
                        marker_id: contact.marker_id,
                        correct: contact.correct,
                        verdict,
                        announced: Some(request.announced),
                        clip: clip.as_ref().map(|c| c.name.clone()),
                    },
                );
                if let Some(clip) = clip {
                    speak(
                        &mut arbiter,
                        &mut outbox,
                        &mut log,
                        &clock,
                        ChannelClass::PathHint,
                        &clip,
                        request.is_lie,
                    );
                }
            }
        }
    }
}
