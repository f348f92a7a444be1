//! Self-play driver for generating training data.
//!
//! Plays complete games with one search per game: a fixed simulation
//! budget per move, the best child is played, and the root advances so
//! the subtree below the played move is reused.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::GameRng;
use crate::error::{GameError, SearchError};
use crate::mcts::{MCTSConfig, MCTSSearch};
use crate::nn::{CellCodeEncoder, PolicyNetwork, StateEncoder};

use super::record::{GameRecord, Ply};

/// Configuration for self-play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelfPlayConfig {
    /// Simulations per move (default: 400).
    pub sims_per_move: u32,

    /// Exploration constant passed to the search.
    pub exploration_constant: f64,

    /// Base seed; each game gets its own fork.
    pub seed: u64,

    /// Use exact solving during search.
    pub solve_terminals: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            sims_per_move: 400,
            exploration_constant: 1.0,
            seed: 0,
            solve_terminals: true,
        }
    }
}

impl SelfPlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set simulations per move.
    #[must_use]
    pub fn with_sims_per_move(mut self, sims: u32) -> Self {
        self.sims_per_move = sims;
        self
    }

    /// Set exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Search configuration for one game.
    #[must_use]
    pub fn search_config(&self, seed: u64) -> MCTSConfig {
        MCTSConfig::default()
            .with_exploration(self.exploration_constant)
            .with_sims_per_move(self.sims_per_move)
            .with_solving(self.solve_terminals)
            .with_seed(seed)
    }
}

/// Runs self-play games and collects their records.
pub struct SelfPlayer {
    config: SelfPlayConfig,
    rng: GameRng,
}

impl SelfPlayer {
    pub fn new(config: SelfPlayConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self { config, rng }
    }

    #[must_use]
    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    /// Play one game on a board of side `size` with random rollouts.
    pub fn play_game(&mut self, size: u8) -> Result<GameRecord, SearchError> {
        let seed = self.rng.fork().seed();
        let search = MCTSSearch::new(size, self.config.search_config(seed))?;
        play_out(search, seed)
    }

    /// Play one game with `network` guiding the search.
    pub fn play_game_with_network<N: PolicyNetwork + 'static>(
        &mut self,
        size: u8,
        network: N,
    ) -> Result<GameRecord, SearchError> {
        let seed = self.rng.fork().seed();
        let search = MCTSSearch::new(size, self.config.search_config(seed))?.with_network(network);
        play_out(search, seed)
    }

    /// Play `count` games without a network.
    pub fn play_games(&mut self, size: u8, count: usize) -> Result<Vec<GameRecord>, SearchError> {
        (0..count).map(|_| self.play_game(size)).collect()
    }
}

fn play_out(mut search: MCTSSearch, seed: u64) -> Result<GameRecord, SearchError> {
    let size = search.root_state().size();
    let mut record = GameRecord::new(size, seed);

    while !search.root_state().is_over() {
        search.run(search.config().sims_per_move.max(1))?;

        let state = search.root_state();
        let at = search
            .best_move()
            .or_else(|| state.available_moves().first().copied())
            .ok_or(SearchError::Game(GameError::GameOver))?;

        record.push(Ply {
            board: CellCodeEncoder.encode(state),
            mover: state.turn(),
            at,
            probabilities: search.move_probabilities(),
        });
        debug!(ply = record.len(), %at, score = search.score(), "self-play move");

        search.update_with_turn(at)?;
    }

    if let Some(&outcome) = search.root_state().outcome() {
        record.finish(outcome);
    }
    info!(size, plies = record.len(), end_score = record.end_score, "self-play game finished");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Coord;
    use crate::core::{Color, GameState};
    use crate::nn::UniformPolicy;

    fn player() -> SelfPlayer {
        SelfPlayer::new(SelfPlayConfig::default().with_sims_per_move(30).with_seed(5))
    }

    #[test]
    fn test_default_config() {
        let config = SelfPlayConfig::default();
        assert_eq!(config.sims_per_move, 400);
        assert_eq!(config.search_config(7).sims_per_move, 400);
        assert_eq!(config.search_config(7).seed, 7);
    }

    #[test]
    fn test_size_one_game() {
        let record = player().play_game(1).unwrap();

        assert_eq!(record.len(), 1);
        assert_eq!(record.plies[0].at, Coord::APEX);
        assert_eq!(record.plies[0].mover, Color::Blue);
        assert_eq!(record.end_score, 1);
    }

    #[test]
    fn test_game_replays_legally() {
        let record = player().play_game(4).unwrap();
        assert!(record.is_finished());

        let mut state = GameState::new(4).unwrap();
        for (i, ply) in record.plies.iter().enumerate() {
            assert_eq!(ply.mover, state.turn(), "ply {i}");
            state.apply_move(ply.at).unwrap();
        }
        assert!(state.is_over());
        assert_eq!(state.outcome().copied(), record.outcome);
    }

    #[test]
    fn test_probabilities_recorded() {
        let record = player().play_game(3).unwrap();
        for ply in record.plies.iter() {
            assert_eq!(ply.probabilities.len(), 64);
            assert_eq!(ply.board.shape, vec![4, 4, 4]);
            let total: f32 = ply.probabilities.iter().sum();
            assert!(total <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn test_games_are_reproducible() {
        let a = player().play_games(3, 2).unwrap();
        let b = player().play_games(3, 2).unwrap();
        assert_eq!(a, b);
        assert_ne!(a[0].seed, a[1].seed);
    }

    #[test]
    fn test_game_with_network() {
        let record = player().play_game_with_network(3, UniformPolicy).unwrap();
        assert!(record.is_finished());
    }
}
