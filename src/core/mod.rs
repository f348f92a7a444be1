//! Core game types: colors, piece inventory, RNG and game state.

pub mod inventory;
pub mod player;
pub mod rng;
pub mod state;

pub use inventory::Inventory;
pub use player::{Color, ColorMap};
pub use rng::GameRng;
pub use state::GameState;
