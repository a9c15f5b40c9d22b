//! Geometry Collaborators
//!
//! The narrow interfaces the simulation needs from the host's physics and
//! navigation layers, plus simple built-in implementations.

use bevy_ecs::prelude::*;
use bitflags::bitflags;
use glam::Vec3;

pub mod navmesh;
pub mod occlusion;
pub mod scene;

pub use navmesh::FlatNavMesh;
pub use occlusion::{is_visible, ray_sphere, Sightline};
pub use scene::{Aabb, BoxScene};

bitflags! {
    /// Collision layers a ray can be filtered by
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Layers: u32 {
        /// Walls, floors, props that block sight
        const ENVIRONMENT = 1 << 0;
        /// Solid but see-through (bars, glass)
        const TRANSPARENT = 1 << 1;
        const AGENT = 1 << 2;
    }
}

/// Identifier of a collider known to the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u32);

/// First thing a ray struck
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub collider: ColliderId,
    pub distance: f32,
    pub point: Vec3,
}

/// Ray queries against static level geometry
pub trait Environment: Send + Sync {
    /// Nearest hit along `direction` (normalized) within `max_distance`,
    /// considering only colliders on `mask`
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: Layers) -> Option<RayHit>;
}

/// Walkable-surface queries
pub trait NavMesh: Send + Sync {
    /// Closest walkable point to `target` within `search_radius`
    fn sample_point(&self, target: Vec3, search_radius: f32) -> Option<Vec3>;
}

/// Resource: the host's environment raycaster
#[derive(Resource)]
pub struct SceneGeometry(pub Box<dyn Environment>);

/// Resource: the host's navigation mesh
#[derive(Resource)]
pub struct NavLink(pub Box<dyn NavMesh>);
