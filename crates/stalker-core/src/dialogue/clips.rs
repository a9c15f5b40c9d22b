//! Clip Bank
//!
//! Named audio clips grouped by what they say.

use std::collections::HashMap;

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use stalker_events::{AgentKind, Direction};

/// An audio clip the host knows how to play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub name: String,
    /// Playback length in seconds
    pub duration: f32,
}

impl Clip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Resource: every line the narrator and agents can say
#[derive(Resource, Debug, Default, Clone)]
pub struct ClipBank {
    hints: HashMap<(Direction, bool), Vec<Clip>>,
    whispers: HashMap<(AgentKind, bool), Vec<Clip>>,
    narration: HashMap<String, Clip>,
}

impl ClipBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hint(&mut self, direction: Direction, truthful: bool, clip: Clip) {
        self.hints.entry((direction, truthful)).or_default().push(clip);
    }

    pub fn add_whisper(&mut self, kind: AgentKind, truthful: bool, clip: Clip) {
        self.whispers.entry((kind, truthful)).or_default().push(clip);
    }

    pub fn add_narration(&mut self, clip: Clip) {
        self.narration.insert(clip.name.clone(), clip);
    }

    /// A random clip announcing `direction` in the given tone
    pub fn pick_hint<R: Rng + ?Sized>(&self, direction: Direction, truthful: bool, rng: &mut R) -> Option<&Clip> {
        let clip = self.hints.get(&(direction, truthful)).and_then(|c| c.choose(rng));
        if clip.is_none() {
            tracing::warn!(
                "No {} hint clips for {}",
                if truthful { "truthful" } else { "lying" },
                direction.as_str()
            );
        }
        clip
    }

    pub fn pick_whisper<R: Rng + ?Sized>(&self, kind: AgentKind, truthful: bool, rng: &mut R) -> Option<&Clip> {
        let clip = self.whispers.get(&(kind, truthful)).and_then(|c| c.choose(rng));
        if clip.is_none() {
            tracing::warn!(
                "No {} whisper clips for {}",
                if truthful { "truthful" } else { "lying" },
                kind.as_str()
            );
        }
        clip
    }

    pub fn narration(&self, name: &str) -> Option<&Clip> {
        self.narration.get(name)
    }

    pub fn len(&self) -> usize {
        self.hints.values().map(Vec::len).sum::<usize>()
            + self.whispers.values().map(Vec::len).sum::<usize>()
            + self.narration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
