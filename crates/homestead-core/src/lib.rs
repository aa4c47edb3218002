//! Homestead Core - top-down life simulation
//!
//! A player walks between a handful of locations, talks to townspeople
//! through paged dialog, gets hungry and tired, and watches an accelerated
//! day/night clock. Rendering, input and storage are collaborators behind
//! narrow traits, so everything here runs headless.
//!
//! # Architecture
//!
//! - **Components**: plain data (`Vec2`, `Rect`, `Player`, live world
//!   entities such as `Obstacle` and `TransitionZone`)
//! - **Systems**: models with per-frame `update` entry points (needs, clock,
//!   NPC agents, dialog, the location/transition core)
//! - **Engine**: `GameEngine` owns one of each and drives them in a fixed
//!   order every frame
//!
//! The live world of the loaded location is a `hecs` world owned by
//! `LocationCore`; it is torn down completely before another location loads.
//!
//! # Example
//!
//! ```rust,no_run
//! use homestead_core::prelude::*;
//!
//! struct Idle;
//! impl InputSource for Idle {
//!     fn movement(&mut self) -> Vec2 { Vec2::ZERO }
//!     fn interact_pressed(&mut self) -> bool { false }
//!     fn advance_pressed(&mut self) -> bool { false }
//!     fn cancel_pressed(&mut self) -> bool { false }
//! }
//!
//! let mut engine = GameEngine::new(
//!     GameConfig::default(),
//!     Catalog::town(),
//!     Collaborators::headless(),
//!     42,
//! );
//! engine.continue_game();
//!
//! loop {
//!     engine.update(1000.0 / 60.0, &mut Idle); // 60 FPS
//! }
//! ```

pub mod catalog;
pub mod components;
pub mod config;
pub mod engine;
pub mod headless;
pub mod persistence;
pub mod stage;
pub mod systems;
pub mod traits;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::catalog::Catalog;
    pub use crate::components::*;
    pub use crate::config::GameConfig;
    pub use crate::engine::{Collaborators, GameEngine, Prompt};
    pub use crate::stage::Stage;
    pub use crate::systems::{DialogOutcome, TransitionPhase, TransitionRequest};
    pub use crate::traits::*;
}
