//! NPC agents - idle/wander behavior and the interaction lock

use rand::Rng;

use crate::catalog::{BehaviorDef, NpcPlacement};
use crate::components::{Appearance, Rect, Vec2};
use crate::traits::ProximityQueryable;

const DIAG: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Directions a wandering NPC picks from: the eight compass points plus
/// standing still
pub const WANDER_DIRECTIONS: [Vec2; 9] = [
    Vec2::new(0.0, -1.0),
    Vec2::new(DIAG, -DIAG),
    Vec2::new(1.0, 0.0),
    Vec2::new(DIAG, DIAG),
    Vec2::new(0.0, 1.0),
    Vec2::new(-DIAG, DIAG),
    Vec2::new(-1.0, 0.0),
    Vec2::new(-DIAG, -DIAG),
    Vec2::ZERO,
];

/// Wander state for one NPC
#[derive(Debug, Clone, PartialEq)]
pub struct Wander {
    pub speed: f32,
    pub interval_ms: f32,
    pub bounds: Option<Rect>,
    pub direction: Vec2,
    pub elapsed_ms: f32,
}

impl Wander {
    fn tick(&mut self, position: Vec2, delta_ms: f32, rng: &mut impl Rng) -> Vec2 {
        self.elapsed_ms += delta_ms;
        if self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms = 0.0;
            self.direction = WANDER_DIRECTIONS[rng.gen_range(0..WANDER_DIRECTIONS.len())];
        }

        if let Some(bounds) = self.bounds {
            if heading_out(&bounds, position, self.direction) {
                self.direction = -self.direction;
            }
        }

        self.direction * self.speed
    }
}

/// Outside `bounds` and still moving further away on some axis
fn heading_out(bounds: &Rect, position: Vec2, direction: Vec2) -> bool {
    (position.x < bounds.min_x() && direction.x < 0.0)
        || (position.x > bounds.max_x() && direction.x > 0.0)
        || (position.y < bounds.min_y() && direction.y < 0.0)
        || (position.y > bounds.max_y() && direction.y > 0.0)
}

/// Movement behavior, resolved once from the catalog tag
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    Idle,
    Wander(Wander),
}

impl From<&BehaviorDef> for Behavior {
    fn from(def: &BehaviorDef) -> Self {
        match *def {
            BehaviorDef::Idle => Behavior::Idle,
            BehaviorDef::Wander {
                speed,
                interval_ms,
                bounds,
            } => Behavior::Wander(Wander {
                speed,
                interval_ms,
                bounds,
                direction: Vec2::ZERO,
                elapsed_ms: 0.0,
            }),
        }
    }
}

/// A spawned NPC
#[derive(Debug, Clone)]
pub struct NpcAgent {
    pub id: String,
    pub name: String,
    pub appearance: Appearance,
    pub position: Vec2,
    pub velocity: Vec2,
    behavior: Behavior,
    interacting: bool,
    dialog: Vec<String>,
}

impl NpcAgent {
    pub fn from_placement(placement: &NpcPlacement) -> Self {
        Self {
            id: placement.id.clone(),
            name: placement.name.clone(),
            appearance: placement.appearance,
            position: placement.position,
            velocity: Vec2::ZERO,
            behavior: Behavior::from(&placement.behavior),
            interacting: false,
            dialog: placement.dialog.clone(),
        }
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn dialog(&self) -> &[String] {
        &self.dialog
    }

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    /// Lock the NPC in place for a conversation
    pub fn start_interaction(&mut self) {
        self.interacting = true;
        self.velocity = Vec2::ZERO;
    }

    pub fn end_interaction(&mut self) {
        self.interacting = false;
    }

    /// Pick a velocity for this frame and integrate the position
    pub fn update(&mut self, delta_ms: f32, rng: &mut impl Rng) {
        self.velocity = match &mut self.behavior {
            Behavior::Idle => Vec2::ZERO,
            Behavior::Wander(wander) => wander.tick(self.position, delta_ms, rng),
        };

        if self.interacting {
            self.velocity = Vec2::ZERO;
        }

        self.position = self.position + self.velocity * (delta_ms / 1000.0);
    }
}

impl ProximityQueryable for NpcAgent {
    fn position(&self) -> Vec2 {
        self.position
    }
}
