//! Tests for move application: gravity, rejections, wins and draws.

use connect4::{COLS, Cell, GameState, GameStatus, Player, ROWS, Rejection, apply_move};

/// Drop a 42-move game into a full board with no four in a row.
const DRAW_SEQUENCE: [i64; 42] = [
    5, 4, 5, 0, 6, 2, 4, 5, 5, 0, 4, 1, 1, 0, 4, 5, 6, 5, 3, 1, 1, 2, 2, 6, 2, 6, 6, 3, 6, 2, 0,
    3, 0, 3, 3, 4, 3, 1, 4, 2, 1, 0,
];

/// Plays columns in order, panicking on any rejection.
fn play(columns: &[i64]) -> GameState {
    columns.iter().fold(GameState::new(), |state, &col| {
        apply_move(&state, col)
            .unwrap_or_else(|e| panic!("move {} rejected: {}", col, e))
            .into_state()
    })
}

#[test]
fn test_new_game() {
    let state = GameState::new();
    assert_eq!(state.current_player(), Player::One);
    assert_eq!(state.status(), GameStatus::InProgress);
    assert!(state.history().is_empty());
    assert_eq!(state.board().occupied(), 0);
}

#[test]
fn test_column_fills_bottom_up_then_rejects() {
    for col in 0..COLS {
        let mut state = GameState::new();
        for (n, expected_row) in (0..ROWS).rev().enumerate() {
            let outcome = apply_move(&state, col as i64).expect("Column has room");
            assert_eq!(outcome.row(), expected_row, "move {} into column {}", n, col);
            state = outcome.into_state();
        }
        assert_eq!(
            apply_move(&state, col as i64).unwrap_err(),
            Rejection::ColumnFull
        );
    }
}

#[test]
fn test_turns_alternate() {
    let state = play(&[0, 1, 2]);
    assert_eq!(state.current_player(), Player::Two);
    let players: Vec<Player> = state.history().iter().map(|m| m.player).collect();
    assert_eq!(players, vec![Player::One, Player::Two, Player::One]);
}

#[test]
fn test_invalid_column_rejected() {
    let state = play(&[3]);
    for col in [-1, 7, 100, i64::MIN] {
        assert_eq!(apply_move(&state, col).unwrap_err(), Rejection::InvalidColumn);
    }
    assert_eq!(state, play(&[3]));
}

#[test]
fn test_horizontal_win() {
    let before = play(&[0, 6, 1, 6, 2, 6]);
    let outcome = apply_move(&before, 3).expect("Valid move");
    let state = outcome.state();
    assert_eq!(state.status(), GameStatus::Won(Player::One));
    assert!(state.is_over());
    assert_eq!(outcome.message(), "Player 1 wins!");
}

#[test]
fn test_vertical_win() {
    let state = play(&[0, 1, 0, 1, 0, 1, 0]);
    assert_eq!(state.status(), GameStatus::Won(Player::One));
    assert_eq!(state.history().len(), 7);
}

#[test]
fn test_slash_diagonal_win() {
    let state = play(&[0, 1, 1, 2, 2, 3, 2, 3, 6, 3, 3]);
    assert_eq!(state.status(), GameStatus::Won(Player::One));
    for (row, col) in [(5, 0), (4, 1), (3, 2), (2, 3)] {
        assert_eq!(state.board().get(row, col), Some(Cell::Occupied(Player::One)));
    }
}

#[test]
fn test_backslash_diagonal_win() {
    let state = play(&[6, 5, 5, 4, 4, 3, 4, 3, 3, 0, 3]);
    assert_eq!(state.status(), GameStatus::Won(Player::One));
}

#[test]
fn test_second_player_can_win() {
    let state = play(&[0, 0, 1, 1, 2, 2, 6, 3, 6, 3]);
    assert_eq!(state.status(), GameStatus::Won(Player::Two));
}

#[test]
fn test_winner_keeps_turn() {
    let state = play(&[0, 6, 1, 6, 2, 6, 3]);
    assert_eq!(state.current_player(), Player::One);
}

#[test]
fn test_finished_game_rejects_everything() {
    let state = play(&[0, 1, 0, 1, 0, 1, 0]);
    for col in [-1, 0, 1, 6, 7] {
        assert_eq!(apply_move(&state, col).unwrap_err(), Rejection::GameAlreadyOver);
    }
}

#[test]
fn test_draw() {
    let before = play(&DRAW_SEQUENCE[..41]);
    assert_eq!(before.status(), GameStatus::InProgress);

    let outcome = apply_move(&before, DRAW_SEQUENCE[41]).expect("Last cell");
    assert_eq!(outcome.message(), "Game ended in a draw!");

    let state = outcome.into_state();
    assert_eq!(state.status(), GameStatus::Drawn);
    assert_eq!(state.board().occupied(), ROWS * COLS);
    assert_eq!(state.history().len(), ROWS * COLS);
    assert_eq!(state.current_player(), Player::Two);
    assert_eq!(apply_move(&state, 0).unwrap_err(), Rejection::GameAlreadyOver);
}

#[test]
fn test_history_matches_pieces() {
    let state = play(&DRAW_SEQUENCE[..20]);
    assert_eq!(state.history().len(), state.board().occupied());
    let columns: Vec<i64> = state.history().iter().map(|m| m.column as i64).collect();
    assert_eq!(columns, DRAW_SEQUENCE[..20].to_vec());
}
