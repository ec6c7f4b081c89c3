//! # Game Controller Module - Authoritative Game State
//!
//! `GameController` owns the "real" game. The search engine only ever
//! receives snapshots (clones) of it, and every move, whether typed by a
//! human or chosen by the engine, goes through [`GameController::try_make_move`].
//!
//! ```text
//!   human input ──┐                       ┌──► snapshot() ──► MCTS
//!                 ├──► try_make_move() ───┤
//!   engine move ──┘                       └──► status() / history()
//! ```

use crate::games::connect4::{Connect4State, Rules};
use crate::{GameError, Player};
use log::info;

/// Current game status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Game is still in progress
    InProgress,
    /// Game ended with a winner
    Win(Player),
    /// Game ended with a full board and no line
    Draw,
}

impl GameStatus {
    /// Check if the game is over
    pub fn is_game_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// A single entry in the move history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveHistoryEntry {
    /// Move number (1-indexed)
    pub move_number: usize,
    /// Player who made the move
    pub player: Player,
    pub column: usize,
    /// Row the piece landed on (0 = bottom)
    pub row: usize,
}

/// Outcome of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub entry: MoveHistoryEntry,
    pub status: GameStatus,
}

/// The central game controller that owns the authoritative game state
pub struct GameController {
    state: Connect4State,
    history: Vec<MoveHistoryEntry>,
}

impl GameController {
    /// Starts a game with `first` to move.
    pub fn new(rules: Rules, first: Player) -> Result<Self, GameError> {
        Ok(Self {
            state: Connect4State::with_first_player(rules, first)?,
            history: Vec::new(),
        })
    }

    /// Read-only view of the authoritative state.
    pub fn state(&self) -> &Connect4State {
        &self.state
    }

    /// An independent copy to hand to the search engine.
    pub fn snapshot(&self) -> Connect4State {
        self.state.clone()
    }

    pub fn history(&self) -> &[MoveHistoryEntry] {
        &self.history
    }

    pub fn current_player(&self) -> Player {
        self.state.current_player()
    }

    /// Win, draw or still running, judged from the last move.
    pub fn status(&self) -> GameStatus {
        if let Some(winner) = self.state.winner() {
            GameStatus::Win(winner)
        } else if !self.state.has_empty_cell() {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        }
    }

    /// Validates and applies a move.
    ///
    /// A rejected move leaves the game unchanged.
    pub fn try_make_move(&mut self, column: usize) -> Result<MoveResult, GameError> {
        if self.status().is_game_over() {
            return Err(GameError::GameOver);
        }

        let player = self.state.current_player();
        let row = self.state.apply(column)?;
        let entry = MoveHistoryEntry {
            move_number: self.history.len() + 1,
            player,
            column,
            row,
        };
        self.history.push(entry.clone());

        let status = self.status();
        if status.is_game_over() {
            info!("game over after {} moves: {:?}", self.history.len(), status);
        }
        Ok(MoveResult { entry, status })
    }
}
