//! Canonical wire and storage form of [`GameState`].
//!
//! ```json
//! {
//!   "board": [[null, 1, 2, ...], ...],
//!   "current_player": 1,
//!   "game_over": false,
//!   "winner": null,
//!   "move_history": [[3, 1], [4, 2]]
//! }
//! ```
//!
//! Row 0 of `board` is the top of the grid. `winner` is `0` for a draw.

use crate::{Board, COLS, Cell, GameState, GameStatus, MoveRecord, Player, ROWS};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Wire value of `winner` for a drawn game.
pub const DRAW: i64 = 0;

/// Serializable game state exactly as it travels over the wire and is stored.
///
/// Fields are wide integers so that out-of-range values survive parsing and
/// can be reported by [`decode`] instead of failing inside serde.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireState {
    /// Rows of cells, top row first; `None` marks an empty cell.
    pub board: Vec<Vec<Option<i64>>>,
    /// Player to move (1 or 2).
    pub current_player: i64,
    /// Whether the game has ended.
    pub game_over: bool,
    /// `None` while in progress, `0` for a draw, otherwise the winner.
    pub winner: Option<i64>,
    /// `(column, player)` pairs, oldest first.
    pub move_history: Vec<(i64, i64)>,
}

/// A stored or received state that cannot be a real game.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Malformed game state: {}", reason)]
pub struct MalformedState {
    /// What was wrong with it.
    pub reason: String,
}

impl MalformedState {
    /// Creates a new error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!(%reason, "Rejecting malformed state");
        Self { reason }
    }
}

/// Converts a state to its wire form. Never fails.
#[instrument(skip(state))]
pub fn encode(state: &GameState) -> WireState {
    let board = state
        .board()
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Cell::Empty => None,
                    Cell::Occupied(player) => Some(i64::from(player.number())),
                })
                .collect()
        })
        .collect();

    let winner = match state.status() {
        GameStatus::InProgress => None,
        GameStatus::Drawn => Some(DRAW),
        GameStatus::Won(player) => Some(i64::from(player.number())),
    };

    WireState {
        board,
        current_player: i64::from(state.current_player().number()),
        game_over: state.is_over(),
        winner,
        move_history: state
            .history()
            .iter()
            .map(|m| (m.column as i64, i64::from(m.player.number())))
            .collect(),
    }
}

/// Rebuilds a state from its wire form.
///
/// # Errors
///
/// Returns [`MalformedState`] if the board is not 6 rows of 7 cells, a cell
/// or player value is out of range, `game_over` disagrees with `winner`, or
/// the move history cannot account for the pieces on the board.
#[instrument(skip(wire), fields(moves = wire.move_history.len()))]
pub fn decode(wire: WireState) -> Result<GameState, MalformedState> {
    if wire.board.len() != ROWS {
        return Err(MalformedState::new(format!(
            "expected {} rows, found {}",
            ROWS,
            wire.board.len()
        )));
    }

    let mut board = Board::new();
    for (row, cells) in wire.board.iter().enumerate() {
        if cells.len() != COLS {
            return Err(MalformedState::new(format!(
                "row {} has {} cells, expected {}",
                row,
                cells.len(),
                COLS
            )));
        }
        for (col, value) in cells.iter().enumerate() {
            let cell = match value {
                None => Cell::Empty,
                Some(n) => Cell::Occupied(Player::from_number(*n).ok_or_else(|| {
                    MalformedState::new(format!("cell ({}, {}) holds {}", row, col, n))
                })?),
            };
            board.set(row, col, cell);
        }
    }

    let current_player = Player::from_number(wire.current_player).ok_or_else(|| {
        MalformedState::new(format!("current_player is {}", wire.current_player))
    })?;

    let status = match wire.winner {
        None => GameStatus::InProgress,
        Some(DRAW) => GameStatus::Drawn,
        Some(n) => GameStatus::Won(
            Player::from_number(n)
                .ok_or_else(|| MalformedState::new(format!("winner is {}", n)))?,
        ),
    };

    if status.is_over() != wire.game_over {
        return Err(MalformedState::new(format!(
            "game_over is {} but winner is {:?}",
            wire.game_over, wire.winner
        )));
    }

    let history = wire
        .move_history
        .iter()
        .map(|&(column, player)| {
            let player = Player::from_number(player)
                .ok_or_else(|| MalformedState::new(format!("history player is {}", player)))?;
            let column = usize::try_from(column)
                .ok()
                .filter(|&c| c < COLS)
                .ok_or_else(|| MalformedState::new(format!("history column is {}", column)))?;
            Ok(MoveRecord { column, player })
        })
        .collect::<Result<Vec<_>, MalformedState>>()?;

    if history.len() != board.occupied() {
        return Err(MalformedState::new(format!(
            "{} moves recorded for {} pieces",
            history.len(),
            board.occupied()
        )));
    }

    Ok(GameState::from_parts(board, current_player, status, history))
}

/// Serializes a state to its JSON storage form.
///
/// # Errors
///
/// Propagates the serializer's error; the wire form holds only integers,
/// booleans and sequences, so this does not fail in practice.
pub fn to_json(state: &GameState) -> serde_json::Result<String> {
    serde_json::to_string(&encode(state))
}

/// Parses a state from its JSON storage form.
///
/// # Errors
///
/// Returns [`MalformedState`] for invalid JSON, a mismatched shape, or any
/// failure [`decode`] reports.
#[instrument(skip(json), fields(len = json.len()))]
pub fn from_json(json: &str) -> Result<GameState, MalformedState> {
    let wire: WireState = serde_json::from_str(json)
        .map_err(|e| MalformedState::new(format!("invalid JSON: {}", e)))?;
    decode(wire)
}

impl From<GameState> for WireState {
    fn from(state: GameState) -> Self {
        encode(&state)
    }
}

impl TryFrom<WireState> for GameState {
    type Error = MalformedState;

    fn try_from(wire: WireState) -> Result<Self, Self::Error> {
        decode(wire)
    }
}
