//! Draw detection for connect four.

use crate::{Board, Cell};
use tracing::instrument;

/// Checks if the board is full (all cells occupied).
///
/// The engine only asks this after ruling out a win, so a full board
/// means a draw.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.rows().iter().flatten().all(|c| *c != Cell::Empty)
}
