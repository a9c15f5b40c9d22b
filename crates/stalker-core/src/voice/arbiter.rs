//! Voice Arbitration
//!
//! Narration outranks monster whispers, which outrank path hints. A request
//! at or above the current rank takes the channel; anything lower is
//! dropped, never queued.

use bevy_ecs::prelude::*;
use stalker_events::{ChannelClass, VoiceOutput};

use crate::dialogue::Clip;

/// The clip currently holding the channel
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveVoice {
    pub channel: ChannelClass,
    pub output: VoiceOutput,
    pub clip: String,
    /// Seconds of playback left
    pub remaining: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arbitration {
    /// Playing now; carries whatever was cut off
    Accepted { preempted: Option<ActiveVoice> },
    /// Outranked by the clip already playing
    Rejected { active: ChannelClass },
}

impl Arbitration {
    pub fn accepted(&self) -> bool {
        matches!(self, Arbitration::Accepted { .. })
    }
}

/// Resource: owner of the shared voice channel
#[derive(Resource, Debug, Default)]
pub struct VoiceArbiter {
    active: Option<ActiveVoice>,
}

impl VoiceArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rank of the active clip, 0 when idle
    pub fn priority(&self) -> u8 {
        self.active.as_ref().map_or(0, |a| a.channel.priority())
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    pub fn active(&self) -> Option<&ActiveVoice> {
        self.active.as_ref()
    }

    pub fn request(&mut self, channel: ChannelClass, clip: &Clip, is_lie: bool) -> Arbitration {
        if let Some(active) = &self.active {
            if channel.priority() < active.channel.priority() {
                return Arbitration::Rejected {
                    active: active.channel,
                };
            }
        }

        let preempted = self.active.replace(ActiveVoice {
            channel,
            output: VoiceOutput::for_lie(is_lie),
            clip: clip.name.clone(),
            remaining: clip.duration.max(0.0),
        });
        Arbitration::Accepted { preempted }
    }

    /// Advance playback; returns the clip that just ended
    pub fn tick(&mut self, dt: f32) -> Option<ActiveVoice> {
        let active = self.active.as_mut()?;
        active.remaining -= dt.max(0.0);
        if active.remaining <= 0.0 {
            self.active.take()
        } else {
            None
        }
    }

    /// Cut the channel without waiting for the clip to end
    pub fn stop(&mut self) -> Option<ActiveVoice> {
        self.active.take()
    }
}
