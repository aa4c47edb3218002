//! Rendering/physics collaborator interface.
//!
//! The core never draws anything itself. It asks the stage for visuals,
//! keeps the returned handles on its entities and gives them back exactly
//! once when the location is torn down.

use serde::{Deserialize, Serialize};

use crate::components::{Appearance, Rect, Vec2};

/// Draw order, back to front
pub mod depth {
    pub const OBSTACLE: i32 = 0;
    pub const ZONE: i32 = 1;
    pub const LABEL: i32 = 2;
    pub const ACTOR: i32 = 5;
}

/// Opaque handle to something the stage created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// What to put on stage
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    Background { width: f32, height: f32, color: u32 },
    Rect { rect: Rect, color: u32, depth: i32 },
    Label { text: String, at: Vec2, depth: i32 },
    Sprite { appearance: Appearance, at: Vec2, depth: i32 },
}

/// Camera fade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    /// Fade to black
    Out,
    /// Fade from black
    In,
}

pub trait Stage {
    /// Resize world and camera bounds
    fn set_world_bounds(&mut self, width: f32, height: f32);
    fn spawn_visual(&mut self, visual: Visual) -> VisualHandle;
    fn move_visual(&mut self, handle: VisualHandle, at: Vec2);
    fn despawn_visual(&mut self, handle: VisualHandle);
    /// Start a camera fade; completion is tracked by the caller's timers
    fn start_fade(&mut self, fade: Fade, duration_ms: f32);
}
