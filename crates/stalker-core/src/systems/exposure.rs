//! Light Exposure
//!
//! Per-agent accumulator of recent illumination. Lit ticks fill the gauge;
//! unlit ticks first burn down a short grace timer, then drain the gauge.

use bevy_ecs::prelude::*;

/// Component: illumination accumulator with hold-then-drain decay
#[derive(Component, Debug, Clone)]
pub struct ExposureGauge {
    level: f32,
    threshold: f32,
    cooldown: f32,
    decay_timer: f32,
}

impl ExposureGauge {
    pub fn new(threshold: f32, cooldown: f32) -> Self {
        Self {
            level: 0.0,
            threshold: threshold.max(0.0),
            cooldown: cooldown.max(0.0),
            decay_timer: 0.0,
        }
    }

    /// Advance one tick. Returns true exactly when the threshold is crossed,
    /// after which the gauge is empty again.
    pub fn tick(&mut self, lit: bool, dt: f32) -> bool {
        let dt = dt.max(0.0);

        if lit {
            self.level += dt;
            self.decay_timer = self.cooldown;
            if self.level >= self.threshold {
                self.reset();
                return true;
            }
        } else if self.decay_timer > 0.0 {
            self.decay_timer = (self.decay_timer - dt).max(0.0);
        } else {
            self.level = (self.level - dt).max(0.0);
        }
        false
    }

    /// Empty the gauge and cancel the grace window
    pub fn reset(&mut self) {
        self.level = 0.0;
        self.decay_timer = 0.0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn decay_timer(&self) -> f32 {
        self.decay_timer
    }

    /// Fill ratio in [0, 1]
    pub fn fraction(&self) -> f32 {
        if self.threshold <= 0.0 {
            0.0
        } else {
            self.level / self.threshold
        }
    }
}
