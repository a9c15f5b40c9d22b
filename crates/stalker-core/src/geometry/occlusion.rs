//! Occlusion Query
//!
//! Line-of-sight tests that tell "blocked by geometry" apart from "visible".

use glam::Vec3;

use super::{ColliderId, Environment, Layers};

/// Shorter deltas than this are not cast
const MIN_CAST_LENGTH: f32 = 1e-4;

/// Result of a line-of-sight test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sightline {
    /// Nothing in the way, or the ray struck the target itself
    Clear,
    /// Geometry in the way
    Obstructed(ColliderId),
    /// Endpoints coincide; nothing was cast and nothing is visible
    Degenerate,
}

impl Sightline {
    pub fn blocked(&self) -> bool {
        matches!(self, Sightline::Obstructed(_))
    }

    pub fn blocker(&self) -> Option<ColliderId> {
        match self {
            Sightline::Obstructed(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Sightline::Clear)
    }
}

/// Can an observer standing at `from` see `to`?
///
/// The ray leaves from `eye_height` above `from`, travels parallel to the
/// feet-to-feet direction and is capped at `max_distance`. A hit on `target`
/// counts as seeing it.
pub fn is_visible(
    env: &dyn Environment,
    from: Vec3,
    to: Vec3,
    eye_height: f32,
    max_distance: f32,
    mask: Layers,
    target: Option<ColliderId>,
) -> Sightline {
    let delta = to - from;
    let length = delta.length();
    if length < MIN_CAST_LENGTH {
        return Sightline::Degenerate;
    }

    let origin = from + Vec3::Y * eye_height;
    let direction = delta / length;
    match env.raycast(origin, direction, length.min(max_distance), mask) {
        Some(hit) if Some(hit.collider) == target => Sightline::Clear,
        Some(hit) => Sightline::Obstructed(hit.collider),
        None => Sightline::Clear,
    }
}

/// Distance along a normalized ray to the first point on a sphere
pub fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = origin - center;
    let b = offset.dot(direction);
    let c = offset.length_squared() - radius * radius;
    if c <= 0.0 {
        // origin inside the sphere
        return Some(0.0);
    }
    if b > 0.0 {
        return None;
    }
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    Some(-b - discriminant.sqrt())
}
