//! # Parallel Connect-Four MCTS Engine
//!
//! Move selection for Connect-Four-style gravity games. A position is
//! searched by several independent Monte Carlo Tree Search workers, each
//! owning a private tree and a private copy of the position. Once every
//! worker has spent its iteration budget, the root statistics are merged by
//! move and the move with the best combined win ratio is returned.
//!
//! ## Layout
//! - [`games`]: game implementations (`Connect4State` and its rules)
//! - [`search`]: the tree, workers, statistics merge and move selection
//! - [`game_controller`]: owner of the authoritative game on the caller side
//!
//! ## Usage
//! ```no_run
//! use mcts::games::connect4::{Connect4State, Rules};
//! use mcts::search::{SearchConfig, MCTS};
//!
//! let mut game = Connect4State::new(Rules::default()).unwrap();
//! game.apply(1).unwrap();
//! let engine = MCTS::new(SearchConfig::default()).unwrap();
//! let reply = engine.choose_move(&game).unwrap();
//! game.apply(reply.0).unwrap();
//! ```

pub mod error;
pub mod game_controller;
pub mod games;
pub mod logging;
pub mod search;

pub use error::{GameError, SearchError};

use std::fmt;

/// One of the two sides of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    A,
    B,
}

impl Player {
    /// Returns the other side.
    pub fn opponent(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::A => write!(f, "X"),
            Player::B => write!(f, "O"),
        }
    }
}

/// The state of a game. Must be cloneable to be used in the MCTS.
/// `Send` and `Sync` are required so workers on different threads can
/// read the same starting position.
pub trait GameState: Clone + Send + Sync {
    /// The type of a move in the game. `Ord` gives the merged statistics a
    /// stable iteration order.
    type Move: Copy + Eq + Ord + std::hash::Hash + std::fmt::Debug + Send + Sync;

    /// Returns all legal moves from the current state, in a deterministic order.
    fn get_possible_moves(&self) -> Vec<Self::Move>;
    /// Applies a move for the player to move and hands the turn over.
    fn make_move(&mut self, mv: Self::Move) -> Result<(), GameError>;
    /// Returns true if the most recent move completed a winning line.
    fn is_won(&self) -> bool;
    /// Returns true while at least one cell is still free.
    fn has_empty_cell(&self) -> bool;
    /// Returns the player whose turn it is to move.
    fn get_current_player(&self) -> Player;
    /// Returns how many moves have been played so far.
    fn get_move_count(&self) -> usize;

    /// Returns true if the game is over, either won or out of space.
    fn is_terminal(&self) -> bool {
        self.is_won() || !self.has_empty_cell()
    }
}
