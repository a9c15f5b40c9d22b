//! Flat Navigation Mesh
//!
//! A rectangular walkable floor with optional blocked footprints.

use glam::{Vec2, Vec3};

use super::scene::Aabb;
use super::NavMesh;

/// Rectangular floor at a fixed height
#[derive(Debug, Clone)]
pub struct FlatNavMesh {
    /// Floor corner on the ground plane (x, z)
    pub min: Vec2,
    pub max: Vec2,
    pub floor_y: f32,
    /// Obstacle footprints agents cannot stand in
    blocked: Vec<Aabb>,
}

impl FlatNavMesh {
    pub fn new(a: Vec2, b: Vec2, floor_y: f32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
            floor_y,
            blocked: Vec::new(),
        }
    }

    pub fn block(&mut self, footprint: Aabb) {
        self.blocked.push(footprint);
    }

    pub fn with_blocked(mut self, footprint: Aabb) -> Self {
        self.block(footprint);
        self
    }

    pub fn is_walkable(&self, point: Vec3) -> bool {
        let on_floor = point.x >= self.min.x
            && point.x <= self.max.x
            && point.z >= self.min.y
            && point.z <= self.max.y;
        on_floor && !self.blocked.iter().any(|b| b.contains_xz(point))
    }

    fn clamp_to_floor(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            self.floor_y,
            point.z.clamp(self.min.y, self.max.y),
        )
    }

    /// Nearest point on the rim of a blocked footprint, nudged outward
    fn push_out(footprint: &Aabb, point: Vec3) -> Vec3 {
        const NUDGE: f32 = 0.01;
        let candidates = [
            (point.x - footprint.min.x, Vec3::new(footprint.min.x - NUDGE, point.y, point.z)),
            (footprint.max.x - point.x, Vec3::new(footprint.max.x + NUDGE, point.y, point.z)),
            (point.z - footprint.min.z, Vec3::new(point.x, point.y, footprint.min.z - NUDGE)),
            (footprint.max.z - point.z, Vec3::new(point.x, point.y, footprint.max.z + NUDGE)),
        ];
        candidates
            .into_iter()
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, p)| p)
            .unwrap_or(point)
    }
}

impl NavMesh for FlatNavMesh {
    fn sample_point(&self, target: Vec3, search_radius: f32) -> Option<Vec3> {
        let mut candidate = self.clamp_to_floor(target);
        if let Some(footprint) = self.blocked.iter().find(|b| b.contains_xz(candidate)) {
            candidate = Self::push_out(footprint, candidate);
        }
        if !self.is_walkable(candidate) {
            return None;
        }

        let flat_target = Vec3::new(target.x, self.floor_y, target.z);
        (candidate.distance(flat_target) <= search_radius).then_some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> FlatNavMesh {
        FlatNavMesh::new(Vec2::new(-10.0, -10.0), Vec2::new(10.0, 10.0), 0.0)
    }

    #[test]
    fn test_walkable_target_is_returned() {
        let nav = floor();
        let point = nav.sample_point(Vec3::new(3.0, 0.0, -2.0), 1.0).unwrap();
        assert_eq!(point, Vec3::new(3.0, 0.0, -2.0));
    }

    #[test]
    fn test_snaps_onto_floor_within_radius() {
        let nav = floor();
        let point = nav.sample_point(Vec3::new(12.0, 0.0, 0.0), 5.0).unwrap();
        assert_eq!(point, Vec3::new(10.0, 0.0, 0.0));
        assert!(nav.sample_point(Vec3::new(30.0, 0.0, 0.0), 5.0).is_none());
    }

    #[test]
    fn test_blocked_footprint_pushes_out() {
        let nav = floor().with_blocked(Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0)));
        assert!(!nav.is_walkable(Vec3::ZERO));

        let point = nav.sample_point(Vec3::new(0.8, 0.0, 0.0), 1.0).unwrap();
        assert!(point.x > 1.0);
        assert!(nav.is_walkable(point));
        assert!(nav.sample_point(Vec3::new(0.0, 0.0, 0.0), 0.5).is_none());
    }
}
