//! Game state: board, pieces, turn and the maintained move list.
//!
//! A `GameState` is created fresh for a new game or cloned from a parent
//! and advanced by one move. Cloning deep-copies the board, inventory and
//! move list, so search expansions and rollouts never touch an ancestor.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::inventory::Inventory;
use super::player::Color;
use crate::board::{Board, Coord};
use crate::error::GameError;
use crate::rules::{self, Outcome};

/// Full state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    inventory: Inventory,
    /// Whose move is next.
    turn: Color,
    /// Set once the game ends; never cleared.
    outcome: Option<Outcome>,
    /// Legal moves for `turn`, in the order child slots are laid out.
    available: Vec<Coord>,
    last_move: Option<Coord>,
}

impl GameState {
    /// Start a new game on a pyramid of side `size`.
    pub fn new(size: u8) -> Result<Self, GameError> {
        rules::validate_size(size)?;

        let mut board = Board::new(size);
        rules::initial_fill(&mut board);
        let available = rules::available_moves(&board);

        Ok(Self {
            board,
            inventory: Inventory::for_size(size),
            turn: Color::FIRST,
            outcome: None,
            available,
            last_move: None,
        })
    }

    #[must_use]
    pub fn size(&self) -> u8 {
        self.board.size()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// The color to move next.
    #[must_use]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The color that made the move leading to this state.
    ///
    /// For a fresh game this is the second player, by convention.
    #[must_use]
    pub fn mover(&self) -> Color {
        self.turn.opponent()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn available_moves(&self) -> &[Coord] {
        &self.available
    }

    #[must_use]
    pub fn last_move(&self) -> Option<Coord> {
        self.last_move
    }

    /// Whether `at` may be played now.
    #[must_use]
    pub fn is_legal(&self, at: Coord) -> bool {
        !self.is_over() && rules::is_legal(&self.board, at)
    }

    /// Play `at` for the side to move.
    ///
    /// Places the piece, resolves the cascade, passes the turn, checks for
    /// the end, then rebuilds the move list (after a cascade) or updates it
    /// incrementally. Returns whether a cascade occurred.
    pub fn apply_move(&mut self, at: Coord) -> Result<bool, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if !rules::is_legal(&self.board, at) {
            return Err(GameError::IllegalMove(at));
        }

        let mover = self.turn;
        rules::place(&mut self.board, at, mover, &mut self.inventory);
        let cascaded = rules::cascade_fill(&mut self.board, at, mover, &mut self.inventory);

        self.turn = mover.opponent();
        self.outcome = rules::check_for_end(&self.board, &self.inventory, self.turn);

        if cascaded {
            self.available = rules::available_moves(&self.board);
        } else {
            rules::update_available_moves(&self.board, &mut self.available, at);
        }
        self.last_move = Some(at);

        trace!(%at, color = %mover, cascaded, over = self.is_over(), "move applied");
        Ok(cascaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::rules::{EndReason, GameResult};

    #[test]
    fn test_new_game() {
        let state = GameState::new(3).unwrap();
        assert_eq!(state.size(), 3);
        assert_eq!(state.turn(), Color::Blue);
        assert_eq!(state.mover(), Color::Green);
        assert!(!state.is_over());
        assert_eq!(state.available_moves().len(), 6);
        assert_eq!(state.last_move(), None);
        assert_eq!(state.inventory().remaining(Color::Blue), 5);
    }

    #[test]
    fn test_invalid_size() {
        assert!(matches!(GameState::new(0), Err(GameError::InvalidSize { .. })));
    }

    #[test]
    fn test_size_one_ends_on_first_move() {
        let mut state = GameState::new(1).unwrap();
        assert_eq!(state.available_moves(), &[Coord::APEX]);

        let cascaded = state.apply_move(Coord::APEX).unwrap();
        assert!(!cascaded);
        assert!(state.is_over());
        let outcome = state.outcome().unwrap();
        assert_eq!(outcome.result, GameResult::Winner(Color::Blue));
        assert_eq!(outcome.reason, EndReason::ApexFilled);
        assert!(state.available_moves().is_empty());
    }

    #[test]
    fn test_apply_move_passes_turn() {
        let mut state = GameState::new(3).unwrap();
        state.apply_move(Coord::new(2, 0, 0)).unwrap();

        assert_eq!(state.turn(), Color::Green);
        assert_eq!(state.mover(), Color::Blue);
        assert_eq!(state.last_move(), Some(Coord::new(2, 0, 0)));
        assert_eq!(state.board().get(Coord::new(2, 0, 0)), Cell::Piece(Color::Blue));
        assert!(!state.available_moves().contains(&Coord::new(2, 0, 0)));
    }

    #[test]
    fn test_illegal_move_rejected_without_change() {
        let mut state = GameState::new(3).unwrap();
        let before = state.clone();

        assert_eq!(
            state.apply_move(Coord::APEX),
            Err(GameError::IllegalMove(Coord::APEX))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_move_after_game_over_rejected() {
        let mut state = GameState::new(1).unwrap();
        state.apply_move(Coord::APEX).unwrap();
        assert_eq!(state.apply_move(Coord::APEX), Err(GameError::GameOver));
    }

    #[test]
    fn test_cascade_during_play() {
        let mut state = GameState::new(3).unwrap();
        for at in [
            Coord::new(2, 0, 0), // Blue
            Coord::new(0, 2, 0), // Green
            Coord::new(1, 1, 0), // Blue
            Coord::new(0, 0, 2), // Green
        ] {
            assert!(!state.apply_move(at).unwrap());
        }

        // Blue completes the cup under (1,0,0); Green fills it.
        assert!(state.apply_move(Coord::new(1, 0, 1)).unwrap());
        assert_eq!(state.board().get(Coord::new(1, 0, 0)), Cell::Piece(Color::Green));
        assert_eq!(state.inventory().remaining(Color::Blue), 2);
        assert_eq!(state.inventory().remaining(Color::Green), 2);
        assert_eq!(state.turn(), Color::Green);
        assert_eq!(state.available_moves(), rules::available_moves(state.board()).as_slice());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut state = GameState::new(3).unwrap();
        let snapshot = state.clone();
        state.apply_move(Coord::new(2, 0, 0)).unwrap();

        assert_eq!(snapshot.turn(), Color::Blue);
        assert!(snapshot.board().get(Coord::new(2, 0, 0)).is_empty());
        assert_eq!(snapshot.available_moves().len(), 6);
    }
}
