//! Patrol Planner
//!
//! Random wandering inside a rectangle around an agent's home point, with a
//! randomized dwell at each stop.

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use rand::Rng;

use crate::components::Navigator;
use crate::config::PatrolTuning;
use crate::geometry::NavMesh;

/// Sample a uniform point inside `home ± half_extents` and snap it to the
/// navmesh. `None` means no walkable point was near enough.
pub fn pick_destination<R: Rng + ?Sized>(
    home: Vec3,
    half_extents: Vec2,
    nav: &dyn NavMesh,
    search_radius: f32,
    rng: &mut R,
) -> Option<Vec3> {
    let x = if half_extents.x > 0.0 {
        rng.gen_range(-half_extents.x..=half_extents.x)
    } else {
        0.0
    };
    let z = if half_extents.y > 0.0 {
        rng.gen_range(-half_extents.y..=half_extents.y)
    } else {
        0.0
    };
    nav.sample_point(home + Vec3::new(x, 0.0, z), search_radius)
}

/// Component: patrol area and dwell timer
#[derive(Component, Debug, Clone)]
pub struct PatrolPlanner {
    /// Center of the patrol rectangle
    pub home: Vec3,
    pub half_extents: Vec2,
    pub wait_range: (f32, f32),
    pub search_radius: f32,
    wait_timer: f32,
}

impl PatrolPlanner {
    pub fn new(home: Vec3, area_size: Vec2, wait_range: (f32, f32), search_radius: f32) -> Self {
        let (a, b) = wait_range;
        Self {
            home,
            half_extents: area_size.abs() * 0.5,
            wait_range: (a.min(b), a.max(b)),
            search_radius,
            wait_timer: 0.0,
        }
    }

    pub fn from_tuning(home: Vec3, area_size: Option<[f32; 2]>, tuning: &PatrolTuning) -> Self {
        let size = area_size.unwrap_or(tuning.area_size);
        Self::new(
            home,
            Vec2::from(size),
            (tuning.min_wait, tuning.max_wait),
            tuning.nav_search_radius,
        )
    }

    pub fn wait_timer(&self) -> f32 {
        self.wait_timer
    }

    /// Clear any pending dwell so the next arrival picks immediately
    pub fn reset_wait(&mut self) {
        self.wait_timer = 0.0;
    }

    /// Pick a new destination now. Leaves the navigator untouched on failure.
    pub fn retarget<R: Rng + ?Sized>(
        &self,
        navigator: &mut Navigator,
        nav: Option<&dyn NavMesh>,
        rng: &mut R,
    ) -> Option<Vec3> {
        let nav = nav?;
        let destination = pick_destination(self.home, self.half_extents, nav, self.search_radius, rng)?;
        navigator.set_destination(destination);
        Some(destination)
    }

    /// One tick of wandering: dwell once arrived, then move on. The dwell is
    /// rerolled even when the navmesh had nothing to offer.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        position: Vec3,
        navigator: &mut Navigator,
        nav: Option<&dyn NavMesh>,
        rng: &mut R,
    ) -> Option<Vec3> {
        if !navigator.has_arrived(position) {
            return None;
        }

        self.wait_timer -= dt;
        if self.wait_timer > 0.0 {
            return None;
        }

        let picked = self.retarget(navigator, nav, rng);
        let (min, max) = self.wait_range;
        self.wait_timer = if max > min { rng.gen_range(min..=max) } else { min };
        picked
    }
}
