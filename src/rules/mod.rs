//! Rules of the pyramid stacking game.
//!
//! Every operation here is a free function over a `Board` (and, where
//! pieces are consumed, an `Inventory`). `GameState` sequences them for a
//! move; search code only ever goes through `GameState`.
//!
//! - `engine`: setup, legality, placement, move lists, end detection
//! - `cascade`: the cup-fill chain reaction

pub mod cascade;
pub mod engine;

pub use cascade::cascade_fill;
pub use engine::{
    available_moves, check_for_end, initial_fill, is_legal, place, update_available_moves,
    validate_size, EndReason, GameResult, Outcome, MAX_SIZE,
};
