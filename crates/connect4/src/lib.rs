//! Connect four rules engine.
//!
//! Pure game logic with no I/O: the board and state types, the rules that
//! detect wins and draws, the [`apply_move`] transition, and the canonical
//! wire form shared by storage, the HTTP API and live updates.
//!
//! # Example
//!
//! ```
//! use connect4::{apply_move, GameState, Player};
//!
//! let state = GameState::new();
//! let outcome = apply_move(&state, 3).expect("empty column");
//! assert_eq!(outcome.row(), 5);
//! assert_eq!(outcome.state().current_player(), Player::Two);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod codec;
mod engine;
pub mod rules;
mod types;

pub use codec::{DRAW, MalformedState, WireState, decode, encode, from_json, to_json};
pub use engine::{MoveOutcome, Rejection, apply_move};
pub use types::{Board, COLS, Cell, GameState, GameStatus, MoveRecord, Player, ROWS};
