//! Core MCTS search algorithm.
//!
//! `MCTSSearch` owns the tree and runs select / simulate / backpropagate
//! cycles synchronously. The threaded `SearchController` drives one of
//! these from its worker; self-play and tests drive it directly with
//! `run`.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::board::Coord;
use crate::core::{GameRng, GameState};
use crate::error::SearchError;
use crate::nn::{NetworkError, PolicyNetwork};
use crate::rules::GameResult;

use super::config::MCTSConfig;
use super::node::{NodeId, SearchNode};
use super::policy::{RandomRollout, SelectionPolicy, SimulationPolicy, Uct};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Snapshot of what the search currently believes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Move the search would play now, if any child exists.
    pub best_move: Option<Coord>,

    /// Root value in `[-1, 1]` from Blue's perspective.
    pub score: f64,

    /// Simulations at the root.
    pub root_sims: u32,

    /// Visit fraction per cell, shaped `(size+1)^3`, 0 for unexplored moves.
    pub probabilities: Vec<f32>,

    /// Proven result of the root, if known.
    pub solved: Option<GameResult>,

    /// True once a collaborator failure forced unweighted search.
    pub degraded: bool,
}

/// Main MCTS search context.
///
/// Owns the search tree, configuration and policies.
pub struct MCTSSearch {
    config: MCTSConfig,

    tree: MCTSTree,

    /// RNG for rollouts.
    rng: GameRng,

    selection: Box<dyn SelectionPolicy>,

    simulation: Box<dyn SimulationPolicy>,

    /// Optional policy/value collaborator.
    network: Option<Box<dyn PolicyNetwork>>,

    stats: SearchStats,

    /// Simulations run since the last committed move.
    sims_since_move: u32,

    /// Most recent collaborator failure, until taken.
    last_error: Option<SearchError>,

    degraded: bool,
}

impl MCTSSearch {
    /// Search a new game of side `size`.
    pub fn new(size: u8, config: MCTSConfig) -> Result<Self, SearchError> {
        Ok(Self::from_state(GameState::new(size)?, config))
    }

    /// Search from an existing position.
    pub fn from_state(state: GameState, config: MCTSConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            config,
            tree: MCTSTree::new(state),
            rng,
            selection: Box::new(Uct),
            simulation: Box::new(RandomRollout),
            network: None,
            stats: SearchStats::default(),
            sims_since_move: 0,
            last_error: None,
            degraded: false,
        }
    }

    /// Set a custom selection policy.
    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom simulation policy.
    pub fn with_simulation<S: SimulationPolicy + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Attach a policy/value collaborator.
    ///
    /// It is called synchronously once per new leaf; a slow model slows
    /// the search by the same amount.
    pub fn with_network<N: PolicyNetwork + 'static>(mut self, network: N) -> Self {
        self.network = Some(Box::new(network));
        self
    }

    /// Run up to `iterations` cycles, stopping early once exhausted.
    ///
    /// Returns the number of cycles actually run.
    pub fn run(&mut self, iterations: u32) -> Result<u32, SearchError> {
        let mut done = 0;
        while done < iterations && self.step()? {
            done += 1;
        }
        Ok(done)
    }

    /// One select / simulate / backpropagate cycle.
    ///
    /// Returns `Ok(false)` without doing anything when the root is solved
    /// or a simulation budget is spent.
    pub fn step(&mut self) -> Result<bool, SearchError> {
        if self.is_exhausted() {
            return Ok(false);
        }

        let start = Instant::now();
        let leaf = self.select()?;
        let value = self.evaluate(leaf)?;
        self.backpropagate(leaf, value);

        self.sims_since_move += 1;
        self.stats.iterations += 1;
        self.stats.time_us += start.elapsed().as_micros() as u64;

        let root = self.tree.root_node();
        if let Some(result) = root.solved {
            info!(?result, sims = root.sims, "search root solved");
        }
        Ok(true)
    }

    /// Check whether the search should idle.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        let root = self.tree.root_node();
        root.is_solved()
            || root.sims >= self.config.max_root_sims
            || (self.config.sims_per_move > 0 && self.sims_since_move >= self.config.sims_per_move)
    }

    /// Descend to the node to simulate, creating a child on the way if the
    /// path reaches a node with unexplored slots.
    fn select(&mut self) -> Result<NodeId, SearchError> {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);

            // A fresh root is simulated before it grows children
            if node.sims == 0 || node.is_solved() {
                return Ok(current);
            }

            if let Some(slot) = node.next_unexplored() {
                return self.expand(current, slot);
            }

            match self.selection.select(&self.tree, current, &self.config) {
                Some(slot) => current = self.tree.get(current).children[slot],
                None => return Ok(current),
            }
        }
    }

    /// Create the child in `slot` of `parent`.
    fn expand(&mut self, parent: NodeId, slot: usize) -> Result<NodeId, SearchError> {
        let parent_node = self.tree.get(parent);
        let mut state = parent_node.state.clone();
        state.apply_move(parent_node.move_at(slot))?;

        let id = self
            .tree
            .attach(parent, slot, SearchNode::new(parent, slot as u16, state));
        self.stats.nodes_created += 1;
        Ok(id)
    }

    /// Value of `leaf` for its mover, in `[0, 1]`.
    fn evaluate(&mut self, leaf: NodeId) -> Result<f64, SearchError> {
        let node = self.tree.get(leaf);
        let mover = node.mover();
        if let Some(result) = node.solved {
            return Ok(result.value_for(mover));
        }

        if let Some(value) = self.consult_network(leaf) {
            self.stats.network_evaluations += 1;
            // Collaborator value is for the side to move, in [-1, 1]
            return Ok(((1.0 - value as f64) / 2.0).clamp(0.0, 1.0));
        }

        let result = self
            .simulation
            .simulate(&self.tree.get(leaf).state, &mut self.rng)?;
        self.stats.rollouts += 1;
        Ok(result.value_for(mover))
    }

    /// Ask the collaborator about `leaf`, storing its priors.
    ///
    /// Returns the value estimate if one was supplied. Failures leave the
    /// node unweighted and mark the search degraded.
    fn consult_network(&mut self, leaf: NodeId) -> Option<f32> {
        let network = self.network.as_ref()?;
        let node = self.tree.get(leaf);
        let slots = node.children.len();

        let prediction = network.predict(&node.state).and_then(|p| {
            if p.priors.len() == slots {
                Ok(p)
            } else {
                Err(NetworkError::ShapeMismatch {
                    expected: slots,
                    got: p.priors.len(),
                })
            }
        });

        match prediction {
            Ok(prediction) => {
                self.tree.get_mut(leaf).priors = Some(prediction.priors);
                prediction.value
            }
            Err(err) => {
                warn!(error = %err, "policy collaborator failed; continuing unweighted");
                self.degraded = true;
                self.last_error = Some(err.into());
                None
            }
        }
    }

    /// Walk from `leaf` to the root adding one simulation and `value`,
    /// flipping perspective at each level. Proofs are pushed upward while
    /// parents keep becoming solved.
    fn backpropagate(&mut self, leaf: NodeId, value: f64) {
        let mut id = leaf;
        let mut value = value;
        let mut propagate = self.config.solve_terminals && self.tree.get(leaf).is_solved();

        loop {
            let node = self.tree.get_mut(id);
            node.sims += 1;
            node.score += value;

            let parent = node.parent;
            if parent.is_none() {
                break;
            }

            if propagate {
                propagate = self.tree.check_for_terminal(parent);
                if propagate {
                    self.stats.nodes_solved += 1;
                    trace!(node = %parent, result = ?self.tree.get(parent).solved, "node solved");
                }
            }

            value = 1.0 - value;
            id = parent;
        }
    }

    /// Advance the root past a committed move.
    ///
    /// The matching child is created if it does not exist yet. A move that
    /// is not available at the root fails with `NoSuchChild` and leaves the
    /// tree untouched.
    pub fn update_with_turn(&mut self, at: Coord) -> Result<(), SearchError> {
        let root = self.tree.root();
        let slot = self
            .tree
            .get(root)
            .slot_of(at)
            .ok_or(SearchError::NoSuchChild(at))?;

        let mut child = self.tree.get(root).children[slot];
        if child.is_none() {
            child = self.expand(root, slot)?;
        }

        let freed = self.tree.reroot(child);
        self.sims_since_move = 0;
        self.stats.root_advances += 1;
        debug!(%at, freed, kept = self.tree.len(), "advanced search root");
        Ok(())
    }

    /// Throw the tree away and start a new game of side `size`.
    pub fn reset(&mut self, size: u8) -> Result<(), SearchError> {
        let state = GameState::new(size)?;
        self.tree.reset(state);
        self.sims_since_move = 0;
        self.stats.reset();
        self.degraded = false;
        self.last_error = None;
        info!(size, "search reset for new game");
        Ok(())
    }

    /// Move the search would play now.
    #[must_use]
    pub fn best_move(&self) -> Option<Coord> {
        let root = self.tree.root();
        self.tree
            .best_child(root)
            .map(|slot| self.tree.get(root).move_at(slot))
    }

    /// Root value in `[-1, 1]` from Blue's perspective.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.tree.root_node().get_score()
    }

    #[must_use]
    pub fn root_sims(&self) -> u32 {
        self.tree.root_node().sims
    }

    /// Per-cell visit fractions, `child_sims / (root_sims - 1)`.
    ///
    /// Shaped `(size+1)^3` in board index order, 0 for unexplored moves.
    #[must_use]
    pub fn move_probabilities(&self) -> Vec<f32> {
        let root = self.tree.root_node();
        let board = root.state.board();
        let mut probs = vec![0.0; board.cells().len()];

        if root.sims > 1 {
            let denom = (root.sims - 1) as f32;
            for (slot, &child) in root.children.iter().enumerate() {
                if !child.is_none() {
                    probs[board.index(root.move_at(slot))] = self.tree.get(child).sims as f32 / denom;
                }
            }
        }
        probs
    }

    /// Child visit counts at the root, in move-list order.
    pub fn move_visits(&self) -> Vec<(Coord, u32)> {
        let root = self.tree.root_node();
        root.state
            .available_moves()
            .iter()
            .zip(&root.children)
            .map(|(&at, &child)| {
                let sims = if child.is_none() { 0 } else { self.tree.get(child).sims };
                (at, sims)
            })
            .collect()
    }

    /// Snapshot for reporting.
    #[must_use]
    pub fn report(&self) -> SearchReport {
        SearchReport {
            best_move: self.best_move(),
            score: self.score(),
            root_sims: self.root_sims(),
            probabilities: self.move_probabilities(),
            solved: self.tree.root_node().solved,
            degraded: self.degraded,
        }
    }

    /// Take the most recent collaborator failure, if any.
    pub fn take_error(&mut self) -> Option<SearchError> {
        self.last_error.take()
    }

    pub(crate) fn record_error(&mut self, err: SearchError) {
        self.last_error = Some(err);
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Position at the root.
    #[must_use]
    pub fn root_state(&self) -> &GameState {
        &self.tree.root_node().state
    }

    #[must_use]
    pub fn sims_since_move(&self) -> u32 {
        self.sims_since_move
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn tree(&self) -> &MCTSTree {
        &self.tree
    }

    #[must_use]
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}
