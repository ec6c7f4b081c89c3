//! End-to-end checks of the board rules through the public API.

use assert_matches::assert_matches;
use mcts::games::connect4::{Connect4State, Rules};
use mcts::search::{SearchConfig, MCTS};
use mcts::{GameError, GameState, Player, SearchError};

/// 4x4 fill that ends without four of a kind in any direction:
/// ```text
/// O X O X
/// O X O X
/// X O X O
/// X O X O
/// ```
const DRAW_SEQUENCE: [usize; 16] = [0, 1, 0, 1, 2, 3, 2, 3, 1, 0, 1, 0, 3, 2, 3, 2];

fn four_by_four() -> Connect4State {
    Connect4State::new(Rules::new(4, 4, 4, true)).unwrap()
}

fn play(state: &mut Connect4State, columns: &[usize]) {
    for &c in columns {
        state.apply(c).unwrap();
    }
}

#[test]
fn empty_board_has_no_victory() {
    let state = four_by_four();
    assert!(!state.check_victory());
    assert!(state.has_empty_cell());
    assert_eq!(state.legal_moves(), vec![0, 1, 2, 3]);
}

#[test]
fn four_stacked_in_one_column_win() {
    let mut state = four_by_four();
    play(&mut state, &[0, 1, 0, 1, 0, 1]);
    assert!(!state.check_victory());
    play(&mut state, &[0]);
    assert!(state.check_victory());
    assert_eq!(state.winner(), Some(Player::A));
}

#[test]
fn four_across_one_row_win() {
    let mut state = four_by_four();
    play(&mut state, &[0, 0, 1, 1, 2, 2]);
    assert!(!state.check_victory());
    play(&mut state, &[3]);
    assert!(state.check_victory());
    assert_eq!(state.last_move(), Some((3, 0)));
}

#[test]
fn full_board_without_line_is_a_draw() {
    let mut state = four_by_four();
    for &column in &DRAW_SEQUENCE {
        state.apply(column).unwrap();
        assert!(!state.check_victory(), "unexpected line after column {}", column);
    }
    assert!(!state.has_empty_cell());
    assert!(!state.check_victory());
    assert!(state.legal_moves().is_empty());
    assert_eq!(state.piece_count(), 16);
}

#[test]
fn opening_move_skips_the_search() {
    let state = four_by_four();
    let engine = MCTS::new(SearchConfig::default().with_workers(4).with_iterations(500)).unwrap();
    let (mv, stats) = engine.search(&state).unwrap();
    assert!(state.is_legal(mv.0));
    assert!(stats.workers.is_empty());
    assert!(stats.merged.is_empty());
    assert_eq!(stats.total_nodes, 0);
}

#[test]
fn full_board_has_no_legal_move() {
    let mut state = four_by_four();
    play(&mut state, &DRAW_SEQUENCE);
    let engine = MCTS::new(SearchConfig::default().with_seed(1)).unwrap();
    assert_matches!(engine.search(&state), Err(SearchError::NoLegalMove));
    assert_matches!(state.apply(0), Err(GameError::ColumnFull { column: 0 }));
}

#[test]
fn apply_is_deterministic() {
    let mut state = four_by_four();
    play(&mut state, &[1, 2, 2, 3, 3]);
    let mut a = state.clone();
    let mut b = state.clone();
    assert_eq!(a.apply(3).unwrap(), b.apply(3).unwrap());
    assert_eq!(a, b);
    assert_eq!(a.check_victory(), b.check_victory());
}

#[test]
fn mutating_a_clone_leaves_original_alone() {
    let mut state = four_by_four();
    play(&mut state, &[2, 1]);
    let original = state.clone();
    let mut copy = state.clone();
    copy.make_move(mcts::games::connect4::Connect4Move(2)).unwrap();
    copy.apply(0).unwrap();
    assert_eq!(state, original);
    assert_eq!(state.get_move_count(), 2);
    assert_eq!(state.current_player(), Player::A);
}
