//! Arena-based search tree.
//!
//! Nodes are stored in a flat `Vec<SearchNode>` and referenced by `NodeId`
//! indices. Parent links are back-indices used only for propagation;
//! ownership flows from the root through the child slots. Advancing the
//! root compacts the arena so everything unreachable is freed.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::node::{NodeId, SearchNode};
use crate::core::GameState;
use crate::rules::GameResult;

/// Arena-based search tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree {
    nodes: Vec<SearchNode>,

    /// The root node ID (always 0 after construction or compaction).
    root: NodeId,
}

impl MCTSTree {
    /// Create a tree whose root holds `state`.
    pub fn new(state: GameState) -> Self {
        let mut nodes = Vec::with_capacity(1024);
        nodes.push(SearchNode::root(state));
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node, returning its ID.
    pub fn alloc(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Allocate `node` and hang it in `slot` of `parent`.
    pub fn attach(&mut self, parent: NodeId, slot: usize, node: SearchNode) -> NodeId {
        debug_assert!(self.get(parent).children[slot].is_none(), "slot already populated");
        let id = self.alloc(node);
        let parent_node = self.get_mut(parent);
        parent_node.children[slot] = id;
        parent_node.unexplored -= 1;
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn root_node(&self) -> &SearchNode {
        self.get(self.root)
    }

    pub fn root_node_mut(&mut self) -> &mut SearchNode {
        self.get_mut(self.root)
    }

    /// Discard everything and start again from `state`.
    pub fn reset(&mut self, state: GameState) {
        self.nodes.clear();
        self.nodes.push(SearchNode::root(state));
        self.root = NodeId::new(0);
    }

    /// Make `new_root` the root and drop every node not below it.
    ///
    /// Returns the number of nodes freed.
    pub fn reroot(&mut self, new_root: NodeId) -> usize {
        let before = self.nodes.len();

        // Breadth-first from the new root gives the keep order
        let mut order = Vec::new();
        let mut queue = VecDeque::from([new_root]);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(self.get(id).children.iter().copied().filter(|c| !c.is_none()));
        }

        let remap: FxHashMap<NodeId, NodeId> = order
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, NodeId::new(new as u32)))
            .collect();

        let mut old_nodes: Vec<Option<SearchNode>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(order.len());
        for old in order {
            if let Some(mut node) = old_nodes[old.0 as usize].take() {
                node.parent = remap.get(&node.parent).copied().unwrap_or(NodeId::NONE);
                for child in &mut node.children {
                    if let Some(&mapped) = remap.get(&*child) {
                        *child = mapped;
                    }
                }
                nodes.push(node);
            }
        }

        self.nodes = nodes;
        self.root = NodeId::new(0);
        let root = self.root_node_mut();
        root.parent = NodeId::NONE;
        root.parent_slot = 0;

        before - self.nodes.len()
    }

    /// Re-derive the proven result of `id` from its children.
    ///
    /// A node is won for the player to move if any child is proven won for
    /// that player. Once every slot exists and is proven, it is a tie if any
    /// child ties and lost otherwise. Returns true if the node became
    /// solved by this call.
    pub fn check_for_terminal(&mut self, id: NodeId) -> bool {
        let node = self.get(id);
        if node.is_solved() || node.children.is_empty() {
            return false;
        }

        let chooser = node.state.turn();
        let mut all_solved = node.is_fully_expanded();
        let mut any_tie = false;
        let mut proven = None;

        for &child in &node.children {
            if child.is_none() {
                all_solved = false;
                continue;
            }
            match self.get(child).solved {
                Some(GameResult::Winner(c)) if c == chooser => {
                    proven = Some(GameResult::Winner(chooser));
                    break;
                }
                Some(GameResult::Tie) => any_tie = true,
                Some(GameResult::Winner(_)) => {}
                None => all_solved = false,
            }
        }

        if proven.is_none() && all_solved {
            proven = Some(if any_tie {
                GameResult::Tie
            } else {
                GameResult::Winner(chooser.opponent())
            });
        }

        match proven {
            Some(result) => {
                self.get_mut(id).solved = Some(result);
                true
            }
            None => false,
        }
    }

    /// Pick the child to play from `id`.
    ///
    /// A proven win for the player to move comes first, then a proven tie,
    /// then the highest win rate among children not proven lost. Proven
    /// losses are only returned when nothing else exists. Returns the slot.
    #[must_use]
    pub fn best_child(&self, id: NodeId) -> Option<usize> {
        let tree = self;
        let node = tree.get(id);
        let chooser = node.state.turn();

        let created = move || {
            node.children
                .iter()
                .enumerate()
                .filter(|(_, c)| !c.is_none())
                .map(move |(slot, &c)| (slot, tree.get(c)))
        };

        if let Some((slot, _)) = created().find(|(_, c)| c.solved == Some(GameResult::Winner(chooser))) {
            return Some(slot);
        }
        if let Some((slot, _)) = created().find(|(_, c)| c.solved == Some(GameResult::Tie)) {
            return Some(slot);
        }

        let by_rate = |lost_ok: bool| {
            created()
                .filter(|(_, c)| lost_ok || c.solved.is_none())
                .fold(None, |best: Option<(usize, f64)>, (slot, c)| {
                    let rate = c.win_rate();
                    match best {
                        Some((_, b)) if b >= rate => best,
                        _ => Some((slot, rate)),
                    }
                })
                .map(|(slot, _)| slot)
        };

        by_rate(false).or_else(|| by_rate(true))
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let mut max_depth = 0;
        let mut queue = VecDeque::from([(self.root, 0u16)]);
        while let Some((id, depth)) = queue.pop_front() {
            max_depth = max_depth.max(depth);
            for &child in &self.get(id).children {
                if !child.is_none() {
                    queue.push_back((child, depth + 1));
                }
            }
        }

        TreeStats {
            node_count: self.nodes.len(),
            solved_count: self.nodes.iter().filter(|n| n.is_solved()).count(),
            terminal_count: self.nodes.iter().filter(|n| n.is_terminal()).count(),
            max_depth,
        }
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }
}

/// Statistics about the search tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub node_count: usize,

    /// Nodes with a proven result, terminal or derived.
    pub solved_count: usize,

    /// Nodes whose game is over.
    pub terminal_count: usize,

    /// Deepest level below the root.
    pub max_depth: u16,
}

impl TreeStats {
    /// Fraction of nodes with a proven result.
    #[must_use]
    pub fn solved_ratio(&self) -> f64 {
        if self.node_count == 0 {
            0.0
        } else {
            self.solved_count as f64 / self.node_count as f64
        }
    }
}
