//! Search node structures.
//!
//! Nodes live in the `MCTSTree` arena and refer to each other by `NodeId`.
//! Each node owns the game state reached by its move and one child slot per
//! available move, in the state's move-list order.

use serde::{Deserialize, Serialize};

use crate::board::Coord;
use crate::core::{Color, GameState};
use crate::rules::GameResult;

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A node in the search tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchNode {
    /// Parent node (NONE for root). Used only for upward propagation.
    pub parent: NodeId,

    /// Slot in the parent's `children` that holds this node.
    pub parent_slot: u16,

    /// State after this node's move.
    pub state: GameState,

    /// Accumulated value from the perspective of `mover()`.
    pub score: f64,

    /// Simulations that passed through this node.
    pub sims: u32,

    /// One slot per available move; NONE until created.
    pub children: Vec<NodeId>,

    /// Collaborator priors, aligned with `children`.
    pub priors: Option<Vec<f32>>,

    /// Child slots not yet created.
    pub unexplored: usize,

    /// Proven game-theoretic result. Once set it never changes.
    pub solved: Option<GameResult>,
}

impl SearchNode {
    pub fn new(parent: NodeId, parent_slot: u16, state: GameState) -> Self {
        let slots = state.available_moves().len();
        let solved = state.outcome().map(|o| o.result);
        Self {
            parent,
            parent_slot,
            state,
            score: 0.0,
            sims: 0,
            children: vec![NodeId::NONE; slots],
            priors: None,
            unexplored: slots,
            solved,
        }
    }

    /// Create a root node.
    pub fn root(state: GameState) -> Self {
        Self::new(NodeId::NONE, 0, state)
    }

    /// The color whose move produced this node.
    #[inline]
    #[must_use]
    pub fn mover(&self) -> Color {
        self.state.mover()
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state.is_over()
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.solved.is_some()
    }

    /// Check if every child slot has been created.
    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.unexplored == 0
    }

    /// Move leading to the child in `slot`.
    #[must_use]
    pub fn move_at(&self, slot: usize) -> Coord {
        self.state.available_moves()[slot]
    }

    /// Slot of `at` in this node's move list.
    #[must_use]
    pub fn slot_of(&self, at: Coord) -> Option<usize> {
        self.state.available_moves().iter().position(|&m| m == at)
    }

    /// Prior for a child slot; 1 without a collaborator.
    #[must_use]
    pub fn prior(&self, slot: usize) -> f32 {
        self.priors
            .as_ref()
            .and_then(|p| p.get(slot).copied())
            .unwrap_or(1.0)
    }

    /// Next slot to create: highest prior when priors exist, otherwise the
    /// first empty slot. Ties go to the earlier slot.
    #[must_use]
    pub fn next_unexplored(&self) -> Option<usize> {
        let mut open = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i);

        match &self.priors {
            None => open.next(),
            Some(priors) => open.fold(None, |best: Option<usize>, i| match best {
                Some(b) if priors[b] >= priors[i] => Some(b),
                _ => Some(i),
            }),
        }
    }

    /// Empirical win rate for the mover, `score / max(sims, 1)`.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        self.score / self.sims.max(1) as f64
    }

    /// Value of this node in `[-1, 1]` from Blue's perspective.
    ///
    /// Exact when solved; otherwise derived from the win rate.
    #[must_use]
    pub fn get_score(&self) -> f64 {
        if let Some(result) = self.solved {
            return result.score() as f64;
        }
        if self.sims == 0 {
            return 0.0;
        }
        let mover_value = 2.0 * self.win_rate() - 1.0;
        if self.mover() == Color::Blue {
            mover_value
        } else {
            -mover_value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(size: u8) -> SearchNode {
        SearchNode::root(GameState::new(size).unwrap())
    }

    #[test]
    fn test_node_id() {
        let id = NodeId::new(5);
        assert_eq!(id.raw(), 5);
        assert!(!id.is_none());
        assert_eq!(format!("{}", id), "NodeId(5)");

        assert!(NodeId::NONE.is_none());
        assert_eq!(format!("{}", NodeId::NONE), "NodeId(NONE)");
    }

    #[test]
    fn test_node_root() {
        let node = root(3);

        assert!(node.parent.is_none());
        assert_eq!(node.sims, 0);
        assert_eq!(node.children.len(), 6);
        assert_eq!(node.unexplored, 6);
        assert!(!node.is_solved());
        assert!(!node.is_fully_expanded());
        // Nobody has moved yet; by convention the second player is the mover
        assert_eq!(node.mover(), Color::Green);
    }

    #[test]
    fn test_next_unexplored_in_order() {
        let mut node = root(3);
        assert_eq!(node.next_unexplored(), Some(0));

        node.children[0] = NodeId::new(1);
        node.children[1] = NodeId::new(2);
        assert_eq!(node.next_unexplored(), Some(2));
    }

    #[test]
    fn test_next_unexplored_by_prior() {
        let mut node = root(3);
        node.priors = Some(vec![0.1, 0.3, 0.05, 0.3, 0.2, 0.05]);
        assert_eq!(node.next_unexplored(), Some(1));

        node.children[1] = NodeId::new(1);
        assert_eq!(node.next_unexplored(), Some(3));
        assert_eq!(node.prior(3), 0.3);
    }

    #[test]
    fn test_prior_defaults_to_one() {
        let node = root(2);
        assert_eq!(node.prior(0), 1.0);
    }

    #[test]
    fn test_slot_lookup() {
        let node = root(2);
        assert_eq!(node.slot_of(Coord::new(1, 0, 0)), Some(2));
        assert_eq!(node.move_at(2), Coord::new(1, 0, 0));
        assert_eq!(node.slot_of(Coord::APEX), None);
    }

    #[test]
    fn test_get_score_perspective() {
        let mut node = root(2);
        assert_eq!(node.get_score(), 0.0);

        // Root mover is Green: a Green win rate of 0.75 is -0.5 for Blue
        node.sims = 4;
        node.score = 3.0;
        assert!((node.get_score() + 0.5).abs() < 1e-9);

        node.solved = Some(GameResult::Winner(Color::Blue));
        assert_eq!(node.get_score(), 1.0);
    }

    #[test]
    fn test_terminal_node_is_solved() {
        let mut state = GameState::new(1).unwrap();
        state.apply_move(Coord::APEX).unwrap();
        let node = SearchNode::new(NodeId::new(0), 0, state);

        assert!(node.is_terminal());
        assert_eq!(node.solved, Some(GameResult::Winner(Color::Blue)));
        assert!(node.children.is_empty());
        assert!(node.is_fully_expanded());
    }

    #[test]
    fn test_serialization() {
        let mut node = root(2);
        node.sims = 100;

        let json = serde_json::to_string(&node).unwrap();
        let deserialized: SearchNode = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.sims, 100);
        assert_eq!(deserialized.children.len(), 3);
        assert_eq!(deserialized.state, node.state);
    }
}
