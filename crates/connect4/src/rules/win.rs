//! Win detection for connect four.
//!
//! A win can only be completed by the piece just placed, so only the
//! four-cell windows through that cell are examined.

use crate::{Board, Cell, Player, COLS, ROWS};
use tracing::instrument;

/// Pieces in a row needed to win.
pub const CONNECT: usize = 4;

/// Axis directions as `(row step, column step)`: horizontal, vertical,
/// diagonal "\" and diagonal "/".
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Checks whether `player` owns a full window through `(row, col)`.
///
/// Examines at most 4 axes x 4 windows x 4 cells.
#[instrument(skip(board))]
pub fn is_winning_placement(board: &Board, row: usize, col: usize, player: Player) -> bool {
    let target = Cell::Occupied(player);
    AXES.iter().any(|&(dr, dc)| {
        (0..CONNECT as isize).any(|offset| {
            let start_row = row as isize - offset * dr;
            let start_col = col as isize - offset * dc;
            (0..CONNECT as isize)
                .all(|i| cell_at(board, start_row + i * dr, start_col + i * dc) == Some(target))
        })
    })
}

fn cell_at(board: &Board, row: isize, col: isize) -> Option<Cell> {
    if row < 0 || col < 0 || row as usize >= ROWS || col as usize >= COLS {
        return None;
    }
    board.get(row as usize, col as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(cells: &[(usize, usize, Player)]) -> Board {
        let mut board = Board::new();
        for &(row, col, player) in cells {
            board.set(row, col, Cell::Occupied(player));
        }
        board
    }

    #[test]
    fn test_no_win_single_piece() {
        let board = board_with(&[(5, 3, Player::One)]);
        assert!(!is_winning_placement(&board, 5, 3, Player::One));
    }

    #[test]
    fn test_horizontal_win_from_middle_of_window() {
        let board = board_with(&[
            (5, 1, Player::One),
            (5, 2, Player::One),
            (5, 3, Player::One),
            (5, 4, Player::One),
        ]);
        assert!(is_winning_placement(&board, 5, 2, Player::One));
    }

    #[test]
    fn test_vertical_win() {
        let board = board_with(&[
            (2, 6, Player::Two),
            (3, 6, Player::Two),
            (4, 6, Player::Two),
            (5, 6, Player::Two),
        ]);
        assert!(is_winning_placement(&board, 2, 6, Player::Two));
        assert!(!is_winning_placement(&board, 2, 6, Player::One));
    }

    #[test]
    fn test_backslash_diagonal_win() {
        let board = board_with(&[
            (2, 0, Player::One),
            (3, 1, Player::One),
            (4, 2, Player::One),
            (5, 3, Player::One),
        ]);
        assert!(is_winning_placement(&board, 4, 2, Player::One));
    }

    #[test]
    fn test_slash_diagonal_win() {
        let board = board_with(&[
            (5, 0, Player::One),
            (4, 1, Player::One),
            (3, 2, Player::One),
            (2, 3, Player::One),
        ]);
        assert!(is_winning_placement(&board, 2, 3, Player::One));
    }

    #[test]
    fn test_three_in_a_row_is_not_a_win() {
        let board = board_with(&[
            (5, 0, Player::One),
            (5, 1, Player::One),
            (5, 2, Player::One),
            (5, 3, Player::Two),
        ]);
        assert!(!is_winning_placement(&board, 5, 2, Player::One));
    }

    #[test]
    fn test_window_does_not_wrap_across_rows() {
        let board = board_with(&[
            (4, 5, Player::One),
            (4, 6, Player::One),
            (3, 0, Player::One),
            (3, 1, Player::One),
        ]);
        assert!(!is_winning_placement(&board, 3, 0, Player::One));
    }
}
