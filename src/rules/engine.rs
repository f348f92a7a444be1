//! Setup, legality, placement, move lists and end-of-game detection.

use serde::{Deserialize, Serialize};

use crate::board::{Axis, Board, Cell, Coord};
use crate::core::{Color, Inventory};
use crate::error::GameError;

/// Largest supported pyramid side.
pub const MAX_SIZE: u8 = 32;

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    Winner(Color),
    Tie,
}

impl GameResult {
    #[must_use]
    pub fn is_winner(&self, color: Color) -> bool {
        matches!(self, GameResult::Winner(c) if *c == color)
    }

    /// Scalar value of this result for `color`: 1 win, 0.5 tie, 0 loss.
    ///
    /// This is the only terminal-value representation used by rollouts,
    /// value estimates and exact solving.
    #[must_use]
    pub fn value_for(&self, color: Color) -> f64 {
        match self {
            GameResult::Winner(c) if *c == color => 1.0,
            GameResult::Winner(_) => 0.0,
            GameResult::Tie => 0.5,
        }
    }

    /// +1 if the first player won, 0 for a tie, -1 otherwise.
    #[must_use]
    pub fn score(&self) -> i32 {
        match self {
            GameResult::Winner(c) if *c == Color::FIRST => 1,
            GameResult::Winner(_) => -1,
            GameResult::Tie => 0,
        }
    }
}

/// What ended the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// The apex cell was occupied.
    ApexFilled,
    /// The player to move had no pieces left.
    OutOfPieces,
}

/// Terminal outcome of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    pub result: GameResult,
    pub reason: EndReason,
    /// Pieces the winner still holds (0 for a tie).
    pub margin: u32,
}

impl Outcome {
    /// Margin-weighted result for training signals: positive when `color`
    /// won, by `1 + margin`.
    #[must_use]
    pub fn signed_margin(&self, color: Color) -> i64 {
        match self.result {
            GameResult::Winner(c) if c == color => 1 + self.margin as i64,
            GameResult::Winner(_) => -(1 + self.margin as i64),
            GameResult::Tie => 0,
        }
    }
}

/// Reject sizes the board cannot represent.
pub fn validate_size(size: u8) -> Result<(), GameError> {
    if (1..=MAX_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(GameError::InvalidSize { size, max: MAX_SIZE })
    }
}

/// Mark the bottom diagonal layer (`x + y + z == size`) as support.
pub fn initial_fill(board: &mut Board) {
    let size = board.size();
    for x in 0..=size {
        for y in 0..=(size - x) {
            board.set(Coord::new(x, y, size - x - y), Cell::Base);
        }
    }
}

/// A move is legal on an in-bounds, empty cell whose three legs are filled.
#[must_use]
pub fn is_legal(board: &Board, at: Coord) -> bool {
    board.contains(at) && board.get(at).is_empty() && board.legs_filled(at)
}

/// Put a piece of `color` on `at` and use one of that color's pieces.
///
/// No legality check is made here; callers validate first.
pub fn place(board: &mut Board, at: Coord, color: Color, inventory: &mut Inventory) {
    debug_assert!(is_legal(board, at), "placing on illegal cell {}", at);
    board.set(at, Cell::Piece(color));
    let taken = inventory.take(color);
    debug_assert!(taken, "{} placed with no pieces left", color);
}

/// Every legal move, scanning layers from the apex downward.
///
/// Within a layer the order is by ascending `x`, then descending `y`.
#[must_use]
pub fn available_moves(board: &Board) -> Vec<Coord> {
    let size = board.size();
    let mut moves = Vec::new();
    for depth in 0..size {
        for x in 0..=depth {
            for y in (0..=(depth - x)).rev() {
                let at = Coord::new(x, y, depth - x - y);
                if board.get(at).is_empty() && board.legs_filled(at) {
                    moves.push(at);
                }
            }
        }
    }
    moves
}

/// Incremental move-list update after a placement that caused no cascade.
///
/// Drops `last` and appends any parent cell (in `X, Y, Z` order) that the
/// placement just completed.
pub fn update_available_moves(board: &Board, moves: &mut Vec<Coord>, last: Coord) {
    if let Some(pos) = moves.iter().position(|&m| m == last) {
        moves.remove(pos);
    }
    for axis in Axis::ALL {
        if let Some(parent) = last.parent(axis) {
            if board.get(parent).is_empty() && board.legs_filled(parent) {
                moves.push(parent);
            }
        }
    }
}

/// Decide whether the game is over with `to_move` next to play.
///
/// An occupied apex ends the game: it is a tie when its three legs all hold
/// the same color and the apex holds the other one, otherwise the apex
/// owner wins. Failing that, a player to move with no pieces loses.
#[must_use]
pub fn check_for_end(board: &Board, inventory: &Inventory, to_move: Color) -> Option<Outcome> {
    if let Some(apex) = board.get(Coord::APEX).color() {
        let legs = Coord::APEX.legs().map(|leg| board.get(leg).color());
        let tied = match legs {
            [Some(a), Some(b), Some(c)] => a == b && b == c && a != apex,
            _ => false,
        };
        return Some(if tied {
            Outcome {
                result: GameResult::Tie,
                reason: EndReason::ApexFilled,
                margin: 0,
            }
        } else {
            Outcome {
                result: GameResult::Winner(apex),
                reason: EndReason::ApexFilled,
                margin: inventory.remaining(apex),
            }
        });
    }

    if !inventory.has_pieces(to_move) {
        let winner = to_move.opponent();
        return Some(Outcome {
            result: GameResult::Winner(winner),
            reason: EndReason::OutOfPieces,
            margin: inventory.remaining(winner),
        });
    }

    None
}
