//! Narration Cues
//!
//! Narrator lines scheduled at fixed times after the level starts.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use stalker_events::{ChannelClass, EventPayload};

use super::{speak, VoiceArbiter};
use crate::components::SimClock;
use crate::dialogue::ClipBank;
use crate::events::EventLog;
use crate::output::Outbox;

/// A narration clip and when it is due
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationCue {
    pub clip: String,
    /// Seconds after level start
    pub delay: f32,
    #[serde(skip)]
    pub fired: bool,
}

impl NarrationCue {
    pub fn new(clip: impl Into<String>, delay: f32) -> Self {
        Self {
            clip: clip.into(),
            delay,
            fired: false,
        }
    }
}

/// Resource: pending narration
#[derive(Resource, Debug, Default)]
pub struct NarrationSchedule {
    pub cues: Vec<NarrationCue>,
}

impl NarrationSchedule {
    pub fn new(cues: Vec<NarrationCue>) -> Self {
        Self { cues }
    }

    pub fn pending(&self) -> usize {
        self.cues.iter().filter(|c| !c.fired).count()
    }
}

/// System: play every cue whose time has come, once
pub fn fire_narration_cues(
    clock: Res<SimClock>,
    bank: Res<ClipBank>,
    mut schedule: ResMut<NarrationSchedule>,
    mut arbiter: ResMut<VoiceArbiter>,
    mut outbox: ResMut<Outbox>,
    mut log: ResMut<EventLog>,
) {
    for cue in schedule.cues.iter_mut() {
        if cue.fired || clock.elapsed < cue.delay as f64 {
            continue;
        }
        cue.fired = true;
        log.record(&clock, EventPayload::NarrationCue { clip: cue.clip.clone() });

        match bank.narration(&cue.clip) {
            Some(clip) => {
                speak(&mut arbiter, &mut outbox, &mut log, &clock, ChannelClass::Narration, clip, false);
            }
            None => tracing::warn!("Narration clip {} is not in the clip bank", cue.clip),
        }
    }
}
