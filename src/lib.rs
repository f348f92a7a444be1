//! # cubicup
//!
//! Rules engine and Monte-Carlo tree search for CubiCup, a two-player
//! stacking game played on a tetrahedral pyramid of cubes.
//!
//! ## Design Principles
//!
//! 1. **Rules are exact and deterministic**: cascade fills resolve in a
//!    fixed X, Y, Z order, and every search is reproducible from its seed.
//!
//! 2. **States are owned values**: search nodes and rollouts work on cloned
//!    `GameState`s, so simulated play never touches an ancestor.
//!
//! 3. **One search worker**: root advances, resets and pauses are staged
//!    as commands and applied between cycles, never inside one.
//!
//! ## Modules
//!
//! - `board`: coordinates, cells and the pyramid grid
//! - `rules`: setup, legality, cascade fill, move lists, end detection
//! - `core`: colors, piece inventory, RNG, game state
//! - `mcts`: search tree, policies, synchronous search, threaded controller
//! - `nn`: optional policy/value collaborator contract and board encoding
//! - `training`: self-play driver and game records
//! - `protocol`: `newGame` / `move` commands and report lines
//! - `error`: typed errors

pub mod board;
pub mod core;
pub mod error;
pub mod mcts;
pub mod nn;
pub mod protocol;
pub mod rules;
pub mod training;

// Re-export commonly used types
pub use crate::board::{Axis, Board, Cell, Coord};

pub use crate::core::{Color, ColorMap, GameRng, GameState, Inventory};

pub use crate::error::{CommandError, EngineError, GameError, SearchError};

pub use crate::rules::{EndReason, GameResult, Outcome};

pub use crate::mcts::{
    MCTSConfig, MCTSSearch, MCTSTree, NodeId, Puct, RandomRollout, SearchController, SearchNode,
    SearchReport, SearchStats, SelectionPolicy, SimulationPolicy, TreeStats, Uct,
};

pub use crate::nn::{NetworkError, PolicyNetwork, Prediction, UniformPolicy};

pub use crate::training::{GameRecord, SelfPlayConfig, SelfPlayer};

pub use crate::protocol::{Command, Engine};
