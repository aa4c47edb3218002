//! Components attached to entities of the currently loaded location.
//!
//! Every such entity carries `LocationMember` and `Visuals`, which is what
//! teardown looks for.

use super::common::{Rect, Vec2};
use crate::stage::VisualHandle;
use crate::traits::ProximityQueryable;

/// Marker: entity belongs to the loaded location and dies with it
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationMember;

/// Marker for the location's background graphic
#[derive(Debug, Clone, Copy, Default)]
pub struct Background;

/// Stage handles owned by an entity, released on teardown
#[derive(Debug, Clone, Default)]
pub struct Visuals(pub Vec<VisualHandle>);

/// Obstacle instance
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub rect: Rect,
    pub color: u32,
    pub name: Option<String>,
}

/// Collision body of a solid obstacle. Only blocks the player once wired.
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub rect: Rect,
    pub wired: bool,
}

/// Transition zone instance
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionZone {
    pub rect: Rect,
    /// Target location id
    pub to: String,
    /// Spawn point in the target location
    pub spawn: Vec2,
    pub label: String,
    pub key: String,
}

impl ProximityQueryable for TransitionZone {
    fn position(&self) -> Vec2 {
        self.rect.center()
    }
}
