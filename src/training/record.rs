//! Game records for training data collection.
//!
//! A record keeps, for every ply of a self-play game, the board as the
//! network would see it before the move, the move played and the search's
//! move-probability grid. Once the game ends it also holds the outcome and
//! the end score used as the value target.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::board::Coord;
use crate::core::Color;
use crate::nn::EncodedState;
use crate::rules::Outcome;

/// One decision point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ply {
    /// Board before the move, as cell codes.
    pub board: EncodedState,

    /// Color that played the move.
    pub mover: Color,

    /// The move played.
    pub at: Coord,

    /// Visit fractions over the `(size+1)^3` grid.
    pub probabilities: Vec<f32>,
}

/// A complete self-play game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub size: u8,

    /// Seed the game's search was started with.
    pub seed: u64,

    /// Plies in play order. Persistent so snapshots share structure.
    pub plies: Vector<Ply>,

    /// Set once the game has ended.
    pub outcome: Option<Outcome>,

    /// +1 first player win, 0 tie, -1 otherwise. 0 until finished.
    pub end_score: i32,
}

impl GameRecord {
    pub fn new(size: u8, seed: u64) -> Self {
        Self {
            size,
            seed,
            plies: Vector::new(),
            outcome: None,
            end_score: 0,
        }
    }

    pub fn push(&mut self, ply: Ply) {
        self.plies.push_back(ply);
    }

    /// Record the final outcome.
    pub fn finish(&mut self, outcome: Outcome) {
        self.end_score = outcome.result.score();
        self.outcome = Some(outcome);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plies.is_empty()
    }

    /// Moves in play order.
    pub fn moves(&self) -> impl Iterator<Item = Coord> + '_ {
        self.plies.iter().map(|p| p.at)
    }

    /// Convert to training samples.
    ///
    /// The value target is the end score, from Blue's perspective, for
    /// every ply. The margin target also weighs in the winner's leftover
    /// pieces; both are 0 until the game is finished.
    pub fn to_training_samples(&self) -> Vec<TrainingSample> {
        let margin = self
            .outcome
            .map_or(0, |outcome| outcome.signed_margin(Color::FIRST)) as f32;

        self.plies
            .iter()
            .map(|ply| TrainingSample {
                state: ply.board.clone(),
                policy: ply.probabilities.clone(),
                value: self.end_score as f32,
                margin,
            })
            .collect()
    }
}

/// A single training sample extracted from a record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Encoded board.
    pub state: EncodedState,

    /// Target policy (search visit distribution).
    pub policy: Vec<f32>,

    /// Target value (end score).
    pub value: f32,

    /// Margin-weighted target: `±(1 + leftover pieces)` for Blue, 0 on a tie.
    pub margin: f32,
}
