//! People-related components: the player and character appearance.

use serde::{Deserialize, Serialize};

use super::common::Vec2;
use crate::traits::{Movable, SpeedControl};

/// Largest value a 24-bit color can hold
pub const COLOR_MASK: u32 = 0x00FF_FFFF;

/// Character colors, each a 24-bit RGB value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    pub skin_tone: u32,
    pub hair_color: u32,
    pub shirt_color: u32,
    pub pants_color: u32,
}

impl Appearance {
    pub fn new(skin_tone: u32, hair_color: u32, shirt_color: u32, pants_color: u32) -> Self {
        Self {
            skin_tone,
            hair_color,
            shirt_color,
            pants_color,
        }
        .masked()
    }

    /// Drop any bits above 24
    pub fn masked(self) -> Self {
        Self {
            skin_tone: self.skin_tone & COLOR_MASK,
            hair_color: self.hair_color & COLOR_MASK,
            shirt_color: self.shirt_color & COLOR_MASK,
            pants_color: self.pants_color & COLOR_MASK,
        }
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            skin_tone: 0xF1C27D,
            hair_color: 0x4A3728,
            shirt_color: 0x3B7DD8,
            pants_color: 0x2F3E56,
        }
    }
}

/// The player character.
///
/// Speed is `base_speed * speed_multiplier`; the multiplier is owned by the
/// needs model and only changes when consequences are applied.
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    pub base_speed: f32,
    speed_multiplier: f32,
    /// Half width/height of the collision box around `position`
    pub half_extents: Vec2,
    pub appearance: Appearance,
}

impl Player {
    pub fn new(position: Vec2, base_speed: f32, appearance: Appearance) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            base_speed,
            speed_multiplier: 1.0,
            half_extents: Vec2::new(12.0, 16.0),
            appearance,
        }
    }

    pub fn speed(&self) -> f32 {
        self.base_speed * self.speed_multiplier
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }
}

impl Movable for Player {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }
}

impl SpeedControl for Player {
    fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier.max(0.0);
    }
}
