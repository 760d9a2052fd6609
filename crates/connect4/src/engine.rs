//! Move application for connect four.
//!
//! [`apply_move`] is the only transition of the game state machine. It reads
//! a snapshot and returns a new one, so nothing is shared between callers.

use crate::rules::{is_full, is_winning_placement};
use crate::{COLS, GameState, GameStatus, Player};
use derive_more::{Display, Error};
use tracing::{debug, instrument};

/// Why a move was refused. The state it was tried against is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Error, strum::AsRefStr)]
pub enum Rejection {
    /// The game already has a winner or ended in a draw.
    #[display("Game is already over")]
    GameAlreadyOver,
    /// The column index is outside 0-6.
    #[display("Invalid column")]
    InvalidColumn,
    /// The column has no empty cell left.
    #[display("Column is full")]
    ColumnFull,
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    state: GameState,
    row: usize,
    column: usize,
    mover: Player,
}

impl MoveOutcome {
    /// The state after the move.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Consumes the outcome, returning the new state.
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Row the piece landed in.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column the piece was dropped into.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Player who made the move.
    pub fn mover(&self) -> Player {
        self.mover
    }

    /// Human-readable summary of the move's effect.
    pub fn message(&self) -> String {
        match self.state.status() {
            GameStatus::Won(player) => format!("{} wins!", player),
            GameStatus::Drawn => "Game ended in a draw!".to_string(),
            GameStatus::InProgress => {
                format!("Move accepted. {} to move.", self.state.current_player())
            }
        }
    }
}

/// Drops the current player's piece into `column`.
///
/// Checks, in order: the game is still in progress, the column is in
/// range, the column has room. The first failure is returned.
///
/// On a win or draw the current player is left as the mover; otherwise
/// the turn passes to the opponent.
///
/// # Errors
///
/// Returns the [`Rejection`] for the first failed precondition.
#[instrument(skip(state), fields(player = %state.current_player(), moves = state.history().len()))]
pub fn apply_move(state: &GameState, column: i64) -> Result<MoveOutcome, Rejection> {
    if state.is_over() {
        return Err(Rejection::GameAlreadyOver);
    }

    let column = usize::try_from(column)
        .ok()
        .filter(|&c| c < COLS)
        .ok_or(Rejection::InvalidColumn)?;

    let row = state
        .board()
        .landing_row(column)
        .ok_or(Rejection::ColumnFull)?;

    let mover = state.current_player();
    let mut next = state.clone();
    next.place(row, column);

    if is_winning_placement(next.board(), row, column, mover) {
        next.set_status(GameStatus::Won(mover));
    } else if is_full(next.board()) {
        next.set_status(GameStatus::Drawn);
    } else {
        next.pass_turn();
    }

    debug!(row, column, status = ?next.status(), "Move applied");

    Ok(MoveOutcome {
        state: next,
        row,
        column,
        mover,
    })
}
