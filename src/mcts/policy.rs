//! MCTS policies for selection and simulation.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: How to choose which child to descend into (UCT, PUCT)
//! - `SimulationPolicy`: How to estimate a fresh leaf (random rollout)

use crate::core::{GameRng, GameState};
use crate::error::GameError;
use crate::rules::GameResult;

use super::config::MCTSConfig;
use super::node::{NodeId, SearchNode};
use super::tree::MCTSTree;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child node to explore.
pub trait SelectionPolicy: Send + Sync {
    /// Selection score of `child`, seen from its parent.
    ///
    /// `child.score` is already from the parent's chooser perspective.
    fn score(&self, child: &SearchNode, parent_sims: u32, prior: f32, config: &MCTSConfig) -> f64;

    /// Slot of the created child with the highest score.
    ///
    /// Ties go to the first maximum in slot order.
    fn select(&self, tree: &MCTSTree, node: NodeId, config: &MCTSConfig) -> Option<usize> {
        let parent = tree.get(node);
        let mut best: Option<(usize, f64)> = None;

        for (slot, &child) in parent.children.iter().enumerate() {
            if child.is_none() {
                continue;
            }
            let score = self.score(tree.get(child), parent.sims, parent.prior(slot), config);
            match best {
                Some((_, b)) if b >= score => {}
                _ => best = Some((slot, score)),
            }
        }

        best.map(|(slot, _)| slot)
    }
}

/// Prior-weighted UCT.
///
/// Formula: score/sims + c * prior * sqrt(ln(parent_sims) / sims).
/// With no collaborator every prior is 1 and this is classical UCT.
#[derive(Clone, Debug, Default)]
pub struct Uct;

impl SelectionPolicy for Uct {
    fn score(&self, child: &SearchNode, parent_sims: u32, prior: f32, config: &MCTSConfig) -> f64 {
        if child.sims == 0 {
            return f64::INFINITY;
        }
        let ln_parent = (parent_sims.max(1) as f64).ln();
        child.win_rate()
            + config.exploration_constant * prior as f64 * (ln_parent / child.sims as f64).sqrt()
    }
}

/// PUCT selection policy (Predictor + UCB for Trees).
///
/// Formula: Q + c * prior * sqrt(parent_sims) / (1 + sims)
#[derive(Clone, Debug, Default)]
pub struct Puct;

impl SelectionPolicy for Puct {
    fn score(&self, child: &SearchNode, parent_sims: u32, prior: f32, config: &MCTSConfig) -> f64 {
        let q = child.win_rate();
        let u = config.exploration_constant * prior as f64 * (parent_sims.max(1) as f64).sqrt()
            / (1.0 + child.sims as f64);
        q + u
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Policy for estimating a leaf by playing the game out.
pub trait SimulationPolicy: Send + Sync {
    /// Play from `state` to the end; `state` itself is left untouched.
    fn simulate(&self, state: &GameState, rng: &mut GameRng) -> Result<GameResult, GameError>;
}

/// Uniformly random legal moves until the game ends.
#[derive(Clone, Debug, Default)]
pub struct RandomRollout;

impl SimulationPolicy for RandomRollout {
    fn simulate(&self, state: &GameState, rng: &mut GameRng) -> Result<GameResult, GameError> {
        let mut state = state.clone();

        loop {
            if let Some(outcome) = state.outcome() {
                return Ok(outcome.result);
            }

            let moves = state.available_moves();
            // An open apex always leaves some supported empty cell
            debug_assert!(!moves.is_empty(), "live game without moves");
            if moves.is_empty() {
                return Ok(GameResult::Tie);
            }

            let at = moves[rng.gen_index(moves.len())];
            state.apply_move(at)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;

    fn tree_with_children(stats: &[(u32, f64)]) -> MCTSTree {
        // Size 3 root has six slots
        let mut tree = MCTSTree::new(GameState::new(3).unwrap());
        let root = tree.root();
        for (slot, &(sims, score)) in stats.iter().enumerate() {
            let mut state = tree.get(root).state.clone();
            state.apply_move(tree.get(root).move_at(slot)).unwrap();
            let mut node = SearchNode::new(root, slot as u16, state);
            node.sims = sims;
            node.score = score;
            tree.attach(root, slot, node);
        }
        tree.root_node_mut().sims = 1 + stats.iter().map(|s| s.0).sum::<u32>();
        tree
    }

    #[test]
    fn test_uct_prefers_unvisited() {
        let tree = tree_with_children(&[(100, 80.0), (10, 7.0), (0, 0.0)]);
        let config = MCTSConfig::default();

        assert_eq!(Uct.select(&tree, tree.root(), &config), Some(2));
    }

    #[test]
    fn test_uct_exploits_with_zero_exploration() {
        let tree = tree_with_children(&[(10, 2.0), (10, 7.0), (10, 5.0)]);
        let config = MCTSConfig::default().with_exploration(0.0);

        assert_eq!(Uct.select(&tree, tree.root(), &config), Some(1));
    }

    #[test]
    fn test_uct_ties_go_to_first() {
        let tree = tree_with_children(&[(10, 5.0), (10, 5.0), (10, 5.0)]);
        let config = MCTSConfig::default();

        assert_eq!(Uct.select(&tree, tree.root(), &config), Some(0));
    }

    #[test]
    fn test_uct_skips_missing_slots() {
        let tree = MCTSTree::new(GameState::new(3).unwrap());
        assert_eq!(Uct.select(&tree, tree.root(), &MCTSConfig::default()), None);
    }

    #[test]
    fn test_priors_weight_exploration() {
        let mut tree = tree_with_children(&[(10, 5.0), (10, 5.0)]);
        tree.root_node_mut().priors = Some(vec![0.1, 0.9, 0.0, 0.0, 0.0, 0.0]);
        let config = MCTSConfig::default();

        assert_eq!(Uct.select(&tree, tree.root(), &config), Some(1));
        assert_eq!(Puct.select(&tree, tree.root(), &config), Some(1));
    }

    #[test]
    fn test_random_rollout_reaches_end() {
        let state = GameState::new(4).unwrap();
        let mut rng = GameRng::new(7);

        for _ in 0..20 {
            let result = RandomRollout.simulate(&state, &mut rng).unwrap();
            assert!(matches!(
                result,
                GameResult::Winner(Color::Blue) | GameResult::Winner(Color::Green) | GameResult::Tie
            ));
        }
        // The source state is untouched
        assert_eq!(state, GameState::new(4).unwrap());
    }

    #[test]
    fn test_random_rollout_deterministic() {
        let state = GameState::new(5).unwrap();
        let a: Vec<_> = {
            let mut rng = GameRng::new(11);
            (0..10).map(|_| RandomRollout.simulate(&state, &mut rng).unwrap()).collect()
        };
        let b: Vec<_> = {
            let mut rng = GameRng::new(11);
            (0..10).map(|_| RandomRollout.simulate(&state, &mut rng).unwrap()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_rollout_of_finished_game() {
        let mut state = GameState::new(1).unwrap();
        state.apply_move(crate::board::Coord::APEX).unwrap();
        let mut rng = GameRng::new(1);

        assert_eq!(
            RandomRollout.simulate(&state, &mut rng).unwrap(),
            GameResult::Winner(Color::Blue)
        );
    }
}
