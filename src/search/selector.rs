//! Turning merged statistics into the move handed back to the caller.

use super::aggregate::MoveTable;
use crate::{GameState, SearchError};
use log::warn;
use rand::seq::IndexedRandom;
use rand::Rng;

/// True on an empty board, where searching tells nothing a coin flip
/// would not.
pub fn is_opening<S: GameState>(state: &S) -> bool {
    state.get_move_count() == 0
}

/// A uniformly random legal move.
pub fn random_move<S, R>(state: &S, rng: &mut R) -> Result<S::Move, SearchError>
where
    S: GameState,
    R: Rng + ?Sized,
{
    state
        .get_possible_moves()
        .choose(rng)
        .copied()
        .ok_or(SearchError::NoLegalMove)
}

/// The merged move with the best win ratio, or a random legal move if the
/// table is empty.
pub fn select_move<S, R>(
    table: &MoveTable<S::Move>,
    state: &S,
    rng: &mut R,
) -> Result<S::Move, SearchError>
where
    S: GameState,
    R: Rng + ?Sized,
{
    match table.best_move() {
        Some(mv) => Ok(mv),
        None => {
            warn!("no search statistics to choose from, playing a random move");
            random_move(state, rng)
        }
    }
}
