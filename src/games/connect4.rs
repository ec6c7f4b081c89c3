//! # Connect 4 Game Implementation
//!
//! Players take turns dropping pieces into columns, trying to line up
//! `win_length` pieces vertically, horizontally or (when allowed) diagonally.
//!
//! ## Rules
//! - Players alternate dropping pieces into columns
//! - Pieces fall to the lowest free row of the chosen column
//! - The first player to complete a line wins
//! - The game is a draw if the board fills up with no winner
//!
//! ## Board Layout
//! Cells are stored column-major with row 0 at the bottom, so a column's
//! pieces always occupy rows `0..height`:
//! ```text
//! row 3 | .  .  .  . |
//! row 2 | .  .  .  . |
//! row 1 | .  O  .  . |
//! row 0 | X  X  O  . |
//!         0  1  2  3   <- column
//! ```

use crate::{GameError, GameState, Player};
use std::fmt;
use std::str::FromStr;

/// Board dimensions and winning condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    /// Number of rows (board height)
    pub rows: usize,
    /// Number of columns (board width)
    pub columns: usize,
    /// Number of pieces in a row needed to win
    pub win_length: usize,
    /// Whether diagonal lines count
    pub allow_diagonal: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            rows: 4,
            columns: 4,
            win_length: 4,
            allow_diagonal: true,
        }
    }
}

impl Rules {
    /// Creates a rule set; call [`Rules::validate`] before use.
    pub fn new(rows: usize, columns: usize, win_length: usize, allow_diagonal: bool) -> Self {
        Self {
            rows,
            columns,
            win_length,
            allow_diagonal,
        }
    }

    /// Checks the dimensions and the win length.
    ///
    /// A line longer than both sides of the board could never be completed.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(GameError::InvalidConfiguration(format!(
                "board must have at least one row and one column, got {}x{}",
                self.rows, self.columns
            )));
        }
        if self.win_length == 0 {
            return Err(GameError::InvalidConfiguration(
                "win length must be at least 1".to_string(),
            ));
        }
        if self.rows.checked_mul(self.columns).is_none() {
            return Err(GameError::InvalidConfiguration(format!(
                "board of {}x{} cells is too large",
                self.rows, self.columns
            )));
        }
        let longest = self.rows.max(self.columns);
        if self.win_length > longest {
            return Err(GameError::InvalidConfiguration(format!(
                "win length {} exceeds the longest board side {}",
                self.win_length, longest
            )));
        }
        Ok(())
    }

    /// Total number of cells, saturating for rules that fail [`Rules::validate`].
    pub fn cell_count(&self) -> usize {
        self.rows.saturating_mul(self.columns)
    }
}

/// Represents a move in Connect 4
///
/// Contains the 0-based column the piece is dropped into.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Connect4Move(pub usize);

impl fmt::Display for Connect4Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Connect4Move {
    type Err = String;

    /// Parses a bare column number such as `"3"`.
    ///
    /// # Examples
    /// ```
    /// use std::str::FromStr;
    /// use mcts::games::connect4::Connect4Move;
    /// let mv = Connect4Move::from_str(" 3 ").unwrap();
    /// assert_eq!(mv.0, 3);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c = s.trim().parse::<usize>().map_err(|e| e.to_string())?;
        Ok(Connect4Move(c))
    }
}

/// Represents the complete state of a Connect 4 game
///
/// Holds the rules, the grid, whose turn it is, how many pieces were placed
/// and where the last one landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connect4State {
    rules: Rules,
    /// Column-major cells, row 0 at the bottom
    board: Vec<Option<Player>>,
    /// Number of pieces in each column
    heights: Vec<usize>,
    current_player: Player,
    piece_count: usize,
    /// Last move made, if any (column, row)
    last_move: Option<(usize, usize)>,
}

impl fmt::Display for Connect4State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.rules.rows).rev() {
            for column in 0..self.rules.columns {
                match self.cell(column, row) {
                    Some(player) => write!(f, "{} ", player)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Connect4State {
    /// Creates an empty board with player A to move.
    pub fn new(rules: Rules) -> Result<Self, GameError> {
        Self::with_first_player(rules, Player::A)
    }

    /// Creates an empty board with the given player to move.
    pub fn with_first_player(rules: Rules, first: Player) -> Result<Self, GameError> {
        rules.validate()?;
        Ok(Self {
            rules,
            board: vec![None; rules.cell_count()],
            heights: vec![0; rules.columns],
            current_player: first,
            piece_count: 0,
            last_move: None,
        })
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Returns the piece at (`column`, `row`), `None` for an empty or
    /// out-of-range cell.
    pub fn cell(&self, column: usize, row: usize) -> Option<Player> {
        if column >= self.rules.columns || row >= self.rules.rows {
            return None;
        }
        self.board[mcts_shared::cell_index(column, row, self.rules.rows)]
    }

    /// Number of pieces already stacked in `column`.
    pub fn column_height(&self, column: usize) -> usize {
        self.heights.get(column).copied().unwrap_or(0)
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn piece_count(&self) -> usize {
        self.piece_count
    }

    /// Coordinates (column, row) of the most recently placed piece.
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    /// A column is legal if it exists and is not full.
    pub fn is_legal(&self, column: usize) -> bool {
        column < self.rules.columns && self.heights[column] < self.rules.rows
    }

    /// Columns with at least one empty cell, ascending.
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..self.rules.columns)
            .filter(|&column| self.heights[column] < self.rules.rows)
            .collect()
    }

    /// Drops the current player's piece into `column` and passes the turn.
    ///
    /// Returns the row the piece landed on. The receiver is mutated; clone
    /// first if the previous position is still needed.
    pub fn apply(&mut self, column: usize) -> Result<usize, GameError> {
        if column >= self.rules.columns {
            return Err(GameError::ColumnOutOfRange {
                column,
                columns: self.rules.columns,
            });
        }
        let row = self.heights[column];
        if row >= self.rules.rows {
            return Err(GameError::ColumnFull { column });
        }

        let idx = mcts_shared::cell_index(column, row, self.rules.rows);
        self.board[idx] = Some(self.current_player);
        self.heights[column] += 1;
        self.piece_count += 1;
        self.last_move = Some((column, row));
        self.current_player = self.current_player.opponent();
        Ok(row)
    }

    pub fn has_empty_cell(&self) -> bool {
        self.piece_count < self.rules.cell_count()
    }

    /// Tests whether the last placed piece completed a line.
    ///
    /// Only the lines through the last move are inspected: a piece that did
    /// not just land cannot have created a new line.
    pub fn check_victory(&self) -> bool {
        let Some((column, row)) = self.last_move else {
            return false;
        };
        mcts_shared::completes_line(
            &self.board,
            self.rules.columns,
            self.rules.rows,
            column,
            row,
            self.rules.win_length,
            self.rules.allow_diagonal,
        )
    }

    /// The player who completed a line with the last move, if any.
    pub fn winner(&self) -> Option<Player> {
        if self.check_victory() {
            Some(self.current_player.opponent())
        } else {
            None
        }
    }
}

impl GameState for Connect4State {
    type Move = Connect4Move;

    fn get_possible_moves(&self) -> Vec<Self::Move> {
        self.legal_moves().into_iter().map(Connect4Move).collect()
    }

    fn make_move(&mut self, mv: Self::Move) -> Result<(), GameError> {
        self.apply(mv.0).map(|_| ())
    }

    fn is_won(&self) -> bool {
        self.check_victory()
    }

    fn has_empty_cell(&self) -> bool {
        Connect4State::has_empty_cell(self)
    }

    fn get_current_player(&self) -> Player {
        self.current_player
    }

    fn get_move_count(&self) -> usize {
        self.piece_count
    }
}
