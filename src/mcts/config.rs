//! MCTS configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// Exploration constant in the selection score (default: 1.0).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Stop searching once the root has this many simulations.
    pub max_root_sims: u32,

    /// Simulations allowed between two committed moves (0 = unlimited).
    pub sims_per_move: u32,

    /// Random seed for rollouts.
    /// Same seed produces deterministic searches.
    pub seed: u64,

    /// How long the worker waits for commands once the budget is spent.
    pub idle_interval_ms: u64,

    /// Propagate proven outcomes upward through the tree.
    pub solve_terminals: bool,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: 1.0,
            max_root_sims: 10_000_000,
            sims_per_move: 0,
            seed: 42,
            idle_interval_ms: 10,
            solve_terminals: true,
        }
    }
}

impl MCTSConfig {
    /// Create a new config with custom exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_max_root_sims(mut self, sims: u32) -> Self {
        self.max_root_sims = sims;
        self
    }

    #[must_use]
    pub fn with_sims_per_move(mut self, sims: u32) -> Self {
        self.sims_per_move = sims;
        self
    }

    #[must_use]
    pub fn with_idle_interval_ms(mut self, ms: u64) -> Self {
        self.idle_interval_ms = ms;
        self
    }

    /// Turn exact solving on or off.
    #[must_use]
    pub fn with_solving(mut self, enabled: bool) -> Self {
        self.solve_terminals = enabled;
        self
    }

    /// Idle wait as a `Duration`.
    #[must_use]
    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }
}
