//! Narrow capabilities the core talks to instead of concrete objects.

use crate::components::Vec2;
use crate::engine::Prompt;
use crate::systems::{ClockReading, DialogPage};

/// Something with a position that can be moved and stopped
pub trait Movable {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
    /// Zero the velocity
    fn stop(&mut self);
}

/// Receives the speed multiplier derived from needs
pub trait SpeedControl {
    fn set_speed_multiplier(&mut self, multiplier: f32);
}

/// Something the player can be near
pub trait ProximityQueryable {
    fn position(&self) -> Vec2;

    /// Euclidean distance strictly below `radius`
    fn is_near_position(&self, position: Vec2, radius: f32) -> bool {
        self.position().distance(&position) < radius
    }
}

/// Normalized player input.
///
/// The `*_pressed` queries are edges: true only on the frame the key went
/// from up to down.
pub trait InputSource {
    /// Movement direction, both components in [-1, 1]
    fn movement(&mut self) -> Vec2;
    fn interact_pressed(&mut self) -> bool;
    /// Space / enter while a dialog is open
    fn advance_pressed(&mut self) -> bool;
    /// Escape while a dialog is open
    fn cancel_pressed(&mut self) -> bool;
}

/// Surface the dialog controller renders pages to
pub trait DialogView {
    fn show_page(&mut self, page: &DialogPage);
    fn hide(&mut self);
}

/// Time bar, needs bars, interaction prompt and toast messages
pub trait Hud {
    fn update_clock(&mut self, reading: &ClockReading);
    fn update_needs(&mut self, hunger: f32, energy: f32);
    fn show_prompt(&mut self, prompt: Option<&Prompt>);
    fn notify(&mut self, message: &str);
}
