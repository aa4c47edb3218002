//! Component definitions.
//!
//! Components are plain data. The ones in `world` are attached to entities
//! of the loaded location; `people` holds the player and appearance data.

mod common;
mod people;
mod world;

pub use common::*;
pub use people::*;
pub use world::*;
