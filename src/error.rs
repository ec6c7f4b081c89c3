//! Error types for game state mutation and search.

use thiserror::Error;

/// Errors raised by game state construction and mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("column {column} is outside the board (0..{columns})")]
    ColumnOutOfRange { column: usize, columns: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("the game is already over")]
    GameOver,
}

/// Errors raised by the search engine.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The board is full: the round is over as a draw.
    #[error("no legal move available")]
    NoLegalMove,

    #[error("the position is already won")]
    GameOver,

    #[error("invalid search configuration: {0}")]
    InvalidConfiguration(String),

    #[error("game error: {0}")]
    Game(#[from] GameError),

    #[error("failed to build the worker thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
