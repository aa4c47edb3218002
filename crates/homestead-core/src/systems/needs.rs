//! Needs model - hunger and energy decay, and the speed penalty they cause

use serde::{Deserialize, Serialize};

use crate::config::NeedsConfig;
use crate::traits::SpeedControl;

pub const NEED_MIN: f32 = 0.0;
pub const NEED_MAX: f32 = 100.0;

/// Persisted needs values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeedsSnapshot {
    pub hunger: f32,
    pub energy: f32,
}

fn clamp_need(value: f32) -> f32 {
    if value.is_nan() {
        NEED_MIN
    } else {
        value.clamp(NEED_MIN, NEED_MAX)
    }
}

/// Hunger and energy, 0 (empty) to 100 (full)
#[derive(Debug, Clone)]
pub struct NeedsModel {
    hunger: f32,
    energy: f32,
    speed_modifier: f32,
    config: NeedsConfig,
}

impl NeedsModel {
    pub fn new(config: NeedsConfig) -> Self {
        Self {
            hunger: NEED_MAX,
            energy: NEED_MAX,
            speed_modifier: 1.0,
            config,
        }
    }

    pub fn hunger(&self) -> f32 {
        self.hunger
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    /// Multiplier last derived from the thresholds
    pub fn speed_modifier(&self) -> f32 {
        self.speed_modifier
    }

    /// Decay both needs by `delta_ms` of real time
    pub fn update(&mut self, delta_ms: f32) {
        let seconds = delta_ms.max(0.0) / 1000.0;
        self.hunger = clamp_need(self.hunger - self.config.hunger_decay_per_sec * seconds);
        self.energy = clamp_need(self.energy - self.config.energy_decay_per_sec * seconds);
        self.recompute_modifier();
    }

    fn recompute_modifier(&mut self) {
        let mut modifier = 1.0;
        if self.hunger < self.config.penalty_threshold {
            modifier -= self.config.penalty;
        }
        if self.energy < self.config.penalty_threshold {
            modifier -= self.config.penalty;
        }
        self.speed_modifier = f32::max(modifier, 0.0);
    }

    /// Push the current modifier to the target. Not automatic: call after
    /// every `update` and after a restore.
    pub fn apply_consequences(&self, target: &mut dyn SpeedControl) {
        target.set_speed_multiplier(self.speed_modifier);
    }

    pub fn add_hunger(&mut self, amount: f32) {
        self.hunger = clamp_need(self.hunger + amount);
        self.recompute_modifier();
    }

    pub fn remove_hunger(&mut self, amount: f32) {
        self.hunger = clamp_need(self.hunger - amount);
        self.recompute_modifier();
    }

    pub fn add_energy(&mut self, amount: f32) {
        self.energy = clamp_need(self.energy + amount);
        self.recompute_modifier();
    }

    pub fn remove_energy(&mut self, amount: f32) {
        self.energy = clamp_need(self.energy - amount);
        self.recompute_modifier();
    }

    pub fn snapshot(&self) -> NeedsSnapshot {
        NeedsSnapshot {
            hunger: self.hunger,
            energy: self.energy,
        }
    }

    /// Restore saved values (clamped) and re-apply the speed penalty
    pub fn restore(&mut self, snapshot: NeedsSnapshot, target: &mut dyn SpeedControl) {
        self.hunger = clamp_need(snapshot.hunger);
        self.energy = clamp_need(snapshot.energy);
        self.recompute_modifier();
        self.apply_consequences(target);
    }
}
