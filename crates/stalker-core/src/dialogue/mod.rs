//! Dialogue
//!
//! The unreliable narrator. Path hints at intersections and the agents'
//! proximity whispers both roll truth, lie or silence through a
//! `DialogueEngine`, pick a clip from the `ClipBank`, and go through voice
//! arbitration.

pub mod clips;
pub mod hints;
pub mod misdirection;
pub mod whisper;

pub use clips::{Clip, ClipBank};
pub use hints::{process_hints, HintEngine, HintQueue, IntersectionMarker, MarkerContact};
pub use misdirection::{lie_direction, DialogueEngine, HintRequest, Utterance, WhisperRequest};
pub use whisper::{process_whispers, WhisperCall, WhisperEngine, WhisperQueue};
