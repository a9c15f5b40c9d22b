//! Box Scene
//!
//! A static set of axis-aligned boxes that answers environment raycasts.

use glam::Vec3;

use super::{ColliderId, Environment, Layers, RayHit};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Corners may be given in any order
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Containment on the ground plane only
    pub fn contains_xz(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Slab test; distance to the entry point, or 0.0 when starting inside
    pub fn ray_entry(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

#[derive(Debug, Clone)]
struct SceneBox {
    id: ColliderId,
    bounds: Aabb,
    layers: Layers,
}

/// Static level geometry built from boxes
#[derive(Debug, Clone, Default)]
pub struct BoxScene {
    boxes: Vec<SceneBox>,
}

impl BoxScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: ColliderId, bounds: Aabb, layers: Layers) {
        self.boxes.push(SceneBox { id, bounds, layers });
    }

    pub fn remove(&mut self, id: ColliderId) -> bool {
        let before = self.boxes.len();
        self.boxes.retain(|b| b.id != id);
        self.boxes.len() != before
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl Environment for BoxScene {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: Layers) -> Option<RayHit> {
        self.boxes
            .iter()
            .filter(|b| b.layers.intersects(mask))
            .filter_map(|b| {
                b.bounds
                    .ray_entry(origin, direction, max_distance)
                    .map(|distance| (b.id, distance))
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(collider, distance)| RayHit {
                collider,
                distance,
                point: origin + direction * distance,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_normalizes_corners() {
        let aabb = Aabb::new(Vec3::new(2.0, 2.0, 2.0), Vec3::ZERO);
        assert_eq!(aabb.min, Vec3::ZERO);
        assert!(aabb.contains(Vec3::ONE));
        assert!(!aabb.contains(Vec3::new(3.0, 1.0, 1.0)));
        assert!(aabb.contains_xz(Vec3::new(1.0, 50.0, 1.0)));
    }

    #[test]
    fn test_nearest_hit_wins() {
        let mut scene = BoxScene::new();
        scene.add(ColliderId(1), Aabb::new(Vec3::new(8.0, -1.0, -1.0), Vec3::new(9.0, 1.0, 1.0)), Layers::ENVIRONMENT);
        scene.add(ColliderId(2), Aabb::new(Vec3::new(3.0, -1.0, -1.0), Vec3::new(4.0, 1.0, 1.0)), Layers::ENVIRONMENT);

        let hit = scene.raycast(Vec3::ZERO, Vec3::X, 20.0, Layers::ENVIRONMENT).unwrap();
        assert_eq!(hit.collider, ColliderId(2));
        assert!((hit.distance - 3.0).abs() < 1e-5);
        assert!((hit.point.x - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_miss_and_range() {
        let mut scene = BoxScene::new();
        scene.add(ColliderId(1), Aabb::new(Vec3::new(8.0, -1.0, -1.0), Vec3::new(9.0, 1.0, 1.0)), Layers::ENVIRONMENT);

        assert!(scene.raycast(Vec3::ZERO, Vec3::Z, 20.0, Layers::ENVIRONMENT).is_none());
        assert!(scene.raycast(Vec3::ZERO, Vec3::X, 5.0, Layers::ENVIRONMENT).is_none());
        assert!(scene.raycast(Vec3::ZERO, Vec3::X, 20.0, Layers::AGENT).is_none());
        assert!(scene.remove(ColliderId(1)));
        assert!(!scene.remove(ColliderId(1)));
        assert!(scene.is_empty());
    }
}
