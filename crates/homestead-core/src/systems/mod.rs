//! Systems - models with per-frame update entry points

mod clock;
mod dialogue;
mod location;
mod movement;
mod needs;
mod npc;

pub use clock::*;
pub use dialogue::*;
pub use location::*;
pub use movement::*;
pub use needs::*;
pub use npc::*;
