//! Misdirection Engine
//!
//! Decides whether the narrator tells the truth, lies or keeps quiet.
//! The first utterance of an engine's lifetime is a coin flip between truth
//! and lie; afterwards it is 40% truth, 40% lie, 20% silence.

use rand::seq::SliceRandom;
use rand::Rng;
use stalker_events::{AgentKind, Direction, Verdict};

use crate::config::EngineTuning;

/// Result of asking an engine to speak
#[derive(Debug, Clone, PartialEq)]
pub enum Utterance<T> {
    /// Spoke too recently; nothing was rolled
    CoolingDown,
    Silent,
    Spoken(T),
}

impl<T> Utterance<T> {
    pub fn spoken(self) -> Option<T> {
        match self {
            Utterance::Spoken(request) => Some(request),
            _ => None,
        }
    }

    pub fn verdict(&self) -> Option<Verdict>
    where
        T: HasVerdict,
    {
        match self {
            Utterance::CoolingDown => None,
            Utterance::Silent => Some(Verdict::Silence),
            Utterance::Spoken(request) => Some(request.verdict()),
        }
    }
}

pub trait HasVerdict {
    fn verdict(&self) -> Verdict;
}

/// A direction to announce at an intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintRequest {
    pub announced: Direction,
    pub is_lie: bool,
}

impl HasVerdict for HintRequest {
    fn verdict(&self) -> Verdict {
        if self.is_lie {
            Verdict::Lie
        } else {
            Verdict::Truth
        }
    }
}

/// An agent's warning, honest or misleading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhisperRequest {
    pub kind: AgentKind,
    pub is_lie: bool,
}

impl HasVerdict for WhisperRequest {
    fn verdict(&self) -> Verdict {
        if self.is_lie {
            Verdict::Lie
        } else {
            Verdict::Truth
        }
    }
}

/// A uniformly chosen available direction other than `correct`
pub fn lie_direction<R: Rng + ?Sized>(available: &[Direction], correct: Direction, rng: &mut R) -> Option<Direction> {
    let mut candidates: Vec<Direction> = available.iter().copied().filter(|d| *d != correct).collect();
    candidates.sort();
    candidates.dedup();
    candidates.choose(rng).copied()
}

/// Cooldown and first-encounter state for one narrator voice
#[derive(Debug, Clone)]
pub struct DialogueEngine {
    has_spoken: bool,
    last_spoken: Option<f64>,
    pub cooldown: f32,
    pub first_encounter_even_odds: bool,
}

impl DialogueEngine {
    pub fn new(cooldown: f32) -> Self {
        Self {
            has_spoken: false,
            last_spoken: None,
            cooldown,
            first_encounter_even_odds: true,
        }
    }

    pub fn from_tuning(tuning: &EngineTuning) -> Self {
        Self {
            first_encounter_even_odds: tuning.first_encounter_even_odds,
            ..Self::new(tuning.cooldown)
        }
    }

    pub fn has_spoken(&self) -> bool {
        self.has_spoken
    }

    pub fn last_spoken(&self) -> Option<f64> {
        self.last_spoken
    }

    pub fn is_cooling_down(&self, now: f64) -> bool {
        self.last_spoken
            .map_or(false, |last| now - last < self.cooldown as f64)
    }

    /// Roll a d100 for the next utterance and mark the engine as used
    pub fn roll<R: Rng + ?Sized>(&mut self, now: f64, rng: &mut R) -> Verdict {
        let first = !self.has_spoken && self.first_encounter_even_odds;
        self.has_spoken = true;
        self.last_spoken = Some(now);

        let roll = rng.gen_range(0..100u32);
        if first {
            if roll < 50 {
                Verdict::Truth
            } else {
                Verdict::Lie
            }
        } else if roll < 40 {
            Verdict::Truth
        } else if roll < 80 {
            Verdict::Lie
        } else {
            Verdict::Silence
        }
    }

    /// The player reached a branching point. A lie with no other path to
    /// point at falls back to the correct direction, reported as truth.
    pub fn on_intersection_entered<R: Rng + ?Sized>(
        &mut self,
        available: &[Direction],
        correct: Direction,
        now: f64,
        bypass_cooldown: bool,
        rng: &mut R,
    ) -> Utterance<HintRequest> {
        if !bypass_cooldown && self.is_cooling_down(now) {
            return Utterance::CoolingDown;
        }

        match self.roll(now, rng) {
            Verdict::Silence => Utterance::Silent,
            Verdict::Truth => Utterance::Spoken(HintRequest {
                announced: correct,
                is_lie: false,
            }),
            Verdict::Lie => match lie_direction(available, correct, rng) {
                Some(announced) => Utterance::Spoken(HintRequest {
                    announced,
                    is_lie: true,
                }),
                None => {
                    tracing::warn!("No alternative to {} at this intersection; telling the truth", correct.as_str());
                    Utterance::Spoken(HintRequest {
                        announced: correct,
                        is_lie: false,
                    })
                }
            },
        }
    }

    /// An agent's one-time warning, honest or misleading
    pub fn proximity_warning<R: Rng + ?Sized>(
        &mut self,
        kind: AgentKind,
        now: f64,
        rng: &mut R,
    ) -> Utterance<WhisperRequest> {
        if self.is_cooling_down(now) {
            return Utterance::CoolingDown;
        }

        match self.roll(now, rng) {
            Verdict::Silence => Utterance::Silent,
            verdict => Utterance::Spoken(WhisperRequest {
                kind,
                is_lie: verdict.is_lie(),
            }),
        }
    }
}
