//! Player movement against axis-aligned obstacles.
//!
//! Algorithm: "move then slide"
//! 1. Try the X step alone; keep it unless it walks into a new collider
//! 2. Same for Y from the resulting position
//! 3. Clamp into the world bounds
//!
//! A blocked axis is dropped while the free one still applies, so the player
//! slides along walls instead of sticking to them. Colliders the player
//! already overlaps do not block, which lets a player spawned inside one
//! walk out.

use crate::components::{Rect, Vec2};

/// Resolve a movement step for a box of `half` extents centered at `from`
pub fn slide_move(from: Vec2, delta: Vec2, half: Vec2, bounds: &Rect, colliders: &[Rect]) -> Vec2 {
    let blocked = |at: Vec2| {
        let body = Rect::around(at, half);
        let start = Rect::around(from, half);
        colliders
            .iter()
            .any(|c| body.intersects(c) && !start.intersects(c))
    };

    let mut pos = from;

    let step_x = Vec2::new(pos.x + delta.x, pos.y);
    if delta.x != 0.0 && !blocked(step_x) {
        pos = step_x;
    }

    let step_y = Vec2::new(pos.x, pos.y + delta.y);
    if delta.y != 0.0 && !blocked(step_y) {
        pos = step_y;
    }

    clamp_to_bounds(pos, half, bounds)
}

/// Keep a box of `half` extents inside `bounds`
pub fn clamp_to_bounds(pos: Vec2, half: Vec2, bounds: &Rect) -> Vec2 {
    let lo_x = bounds.min_x() + half.x;
    let hi_x = (bounds.max_x() - half.x).max(lo_x);
    let lo_y = bounds.min_y() + half.y;
    let hi_y = (bounds.max_y() - half.y).max(lo_y);
    Vec2::new(pos.x.clamp(lo_x, hi_x), pos.y.clamp(lo_y, hi_y))
}
