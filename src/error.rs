//! Error types for the game engine and search.

use thiserror::Error;

use crate::board::Coord;

/// Failures from the rules engine and game state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move at {0}: cell is occupied, out of bounds or unsupported")]
    IllegalMove(Coord),

    #[error("game already over")]
    GameOver,

    #[error("invalid board size {size} (expected 1..={max})")]
    InvalidSize { size: u8, max: u8 },
}

/// Failures surfaced by the search engine and its controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("no child for move {0} at the search root")]
    NoSuchChild(Coord),

    #[error("policy collaborator unavailable: {0}")]
    SearchUnavailable(String),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("search worker has stopped")]
    WorkerStopped,
}

impl From<crate::nn::NetworkError> for SearchError {
    fn from(err: crate::nn::NetworkError) -> Self {
        SearchError::SearchUnavailable(err.to_string())
    }
}

/// Malformed textual commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("invalid game size '{0}'")]
    InvalidSize(String),

    #[error("invalid move '{0}' (expected x,y,z)")]
    InvalidMove(String),
}

/// Failures from the command-driven engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("no game in progress; send newGame first")]
    NoGame,
}
