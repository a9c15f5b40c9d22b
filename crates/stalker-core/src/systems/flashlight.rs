//! Flashlight
//!
//! The player's battery-powered light. While on it drains and lights the
//! nearest agent in its beam; run flat and it locks out until recharged
//! past the recovery threshold.

use bevy_ecs::prelude::*;
use glam::Vec3;
use stalker_events::EventPayload;

use crate::components::{Agent, Illuminated, PlayerPose, Position, SimClock};
use crate::config::FlashlightTuning;
use crate::events::EventLog;
use crate::geometry::{ray_sphere, Layers, SceneGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashlightChange {
    Depleted,
    Recovered,
}

/// What one battery tick produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlashlightTick {
    /// The beam is out this tick
    pub casting: bool,
    pub change: Option<FlashlightChange>,
}

/// Resource: the player's flashlight
#[derive(Resource, Debug, Clone)]
pub struct Flashlight {
    on: bool,
    battery: f32,
    depleted: bool,
    /// Only a fully drained battery recharges
    recharging: bool,
    pub tuning: FlashlightTuning,
}

impl Flashlight {
    pub fn new(tuning: FlashlightTuning) -> Self {
        Self {
            on: false,
            battery: tuning.max_battery,
            depleted: false,
            recharging: false,
            tuning,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn battery(&self) -> f32 {
        self.battery
    }

    pub fn is_depleted(&self) -> bool {
        self.depleted
    }

    pub fn is_recharging(&self) -> bool {
        self.recharging
    }

    /// Refused while depleted
    pub fn turn_on(&mut self) -> bool {
        if self.depleted {
            tracing::debug!("Flashlight depleted; needs {} battery", self.tuning.recovery_threshold);
            return false;
        }
        self.on = true;
        true
    }

    pub fn turn_off(&mut self) {
        self.on = false;
    }

    /// Returns whether the light is on afterwards
    pub fn toggle(&mut self) -> bool {
        if self.on {
            self.turn_off();
        } else {
            self.turn_on();
        }
        self.on
    }

    pub fn tick(&mut self, dt: f32) -> FlashlightTick {
        let dt = dt.max(0.0);
        let mut result = FlashlightTick::default();

        if self.on {
            self.recharging = false;
            if self.battery > 0.0 {
                self.battery -= self.tuning.drain_rate * dt;
                result.casting = true;
            }
            if self.battery <= 0.0 {
                self.battery = 0.0;
                self.depleted = true;
                self.recharging = true;
                self.on = false;
                result.change = Some(FlashlightChange::Depleted);
            }
        } else if self.recharging {
            self.battery = (self.battery + self.tuning.recharge_rate * dt).min(self.tuning.max_battery);
            if self.battery >= self.tuning.max_battery {
                self.recharging = false;
            }
            if self.depleted && self.battery >= self.tuning.recovery_threshold {
                self.depleted = false;
                result.change = Some(FlashlightChange::Recovered);
            }
        }
        result
    }
}

/// Index of the nearest sphere hit closer than `limit`
pub fn nearest_lit(
    origin: Vec3,
    direction: Vec3,
    limit: f32,
    radius: f32,
    centers: impl Iterator<Item = (usize, Vec3)>,
) -> Option<usize> {
    centers
        .filter_map(|(i, center)| ray_sphere(origin, direction, center, radius).map(|d| (i, d)))
        .filter(|(_, d)| *d <= limit)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
}

/// System: drain the battery and light whatever the beam strikes first
pub fn update_flashlight(
    clock: Res<SimClock>,
    flashlight: Option<ResMut<Flashlight>>,
    player: Option<Res<PlayerPose>>,
    scene: Option<Res<SceneGeometry>>,
    mut log: ResMut<EventLog>,
    mut agents: Query<(&Position, &mut Illuminated), With<Agent>>,
) {
    let Some(mut flashlight) = flashlight else {
        return;
    };
    if !flashlight.tuning.enabled {
        return;
    }

    let tick = flashlight.tick(clock.dt);
    match tick.change {
        Some(FlashlightChange::Depleted) => {
            tracing::info!("Flashlight battery depleted");
            log.record(&clock, EventPayload::FlashlightDepleted);
        }
        Some(FlashlightChange::Recovered) => {
            tracing::info!("Flashlight usable again");
            log.record(&clock, EventPayload::FlashlightRecovered);
        }
        None => {}
    }

    if !tick.casting {
        return;
    }
    let Some(player) = player else {
        return;
    };
    let direction = player.facing.normalize_or_zero();
    if direction == Vec3::ZERO {
        return;
    }

    let origin = player.eye();
    let range = flashlight.tuning.light_range;
    let wall = scene
        .as_ref()
        .and_then(|s| s.0.raycast(origin, direction, range, Layers::ENVIRONMENT))
        .map_or(range, |hit| hit.distance);

    let lift = Vec3::Y * flashlight.tuning.agent_center_height;
    let centers: Vec<Vec3> = agents.iter().map(|(p, _)| p.0 + lift).collect();
    let Some(index) = nearest_lit(
        origin,
        direction,
        wall,
        flashlight.tuning.agent_hit_radius,
        centers.iter().copied().enumerate(),
    ) else {
        return;
    };

    if let Some((_, mut lit)) = agents.iter_mut().nth(index) {
        lit.0 = true;
    }
}
