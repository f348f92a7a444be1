//! Monte Carlo Tree Search for CubiCup.
//!
//! ## Overview
//!
//! - **Arena tree**: nodes own their game state and one slot per available
//!   move; parent links are back-indices only
//! - **Exact solving**: proven wins, losses and ties propagate upward and
//!   steer the final move choice
//! - **Optional collaborator**: per-move priors weight the selection score
//!   and a value estimate can replace the random rollout
//! - **Threaded controller**: a dedicated worker with a command channel and
//!   a pause rendezvous for consistent snapshots
//!
//! ## Usage
//!
//! ```rust
//! use cubicup::mcts::{MCTSConfig, MCTSSearch};
//!
//! let mut search = MCTSSearch::new(3, MCTSConfig::default().with_seed(7))?;
//! search.run(500)?;
//!
//! let report = search.report();
//! assert!(report.best_move.is_some());
//! assert!((-1.0..=1.0).contains(&report.score));
//! # Ok::<(), cubicup::error::SearchError>(())
//! ```
//!
//! ## Custom Policies
//!
//! ```rust,ignore
//! use cubicup::mcts::{MCTSSearch, MCTSConfig, Puct};
//!
//! let search = MCTSSearch::new(4, config)?
//!     .with_selection(Puct)
//!     .with_network(model);
//! ```

pub mod config;
pub mod controller;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

pub use config::MCTSConfig;
pub use controller::SearchController;
pub use node::{NodeId, SearchNode};
pub use policy::{Puct, RandomRollout, SelectionPolicy, SimulationPolicy, Uct};
pub use search::{MCTSSearch, SearchReport};
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
