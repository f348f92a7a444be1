//! MCTS search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Counters collected while searching.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Completed select/simulate/backpropagate cycles.
    pub iterations: u64,

    /// Random rollouts played.
    pub rollouts: u64,

    /// Leaves scored by the value collaborator instead of a rollout.
    pub network_evaluations: u64,

    /// Nodes added to the tree.
    pub nodes_created: u64,

    /// Nodes proven through their children.
    pub nodes_solved: u64,

    /// Committed moves that advanced the root.
    pub root_advances: u64,

    /// Total time spent in search cycles (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Calculate iterations per second.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Average nodes created per cycle.
    #[must_use]
    pub fn avg_nodes_per_iteration(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.nodes_created as f64 / self.iterations as f64
        }
    }
}
