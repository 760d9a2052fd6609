//! Core domain types for connect four.

use serde::{Deserialize, Serialize};

/// Number of rows on the board.
pub const ROWS: usize = 6;

/// Number of columns on the board.
pub const COLS: usize = 7;

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Player {
    /// Player 1 (moves first).
    One,
    /// Player 2.
    Two,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Returns the numeric id used on the wire (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    /// Parses a numeric player id. Only 1 and 2 name real players.
    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell occupied by a player.
    Occupied(Player),
}

/// 6x7 connect-four board.
///
/// Row 0 is the top row, row 5 the bottom. Pieces fall to the highest
/// empty row index in their column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the cell at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Returns the rows of the board, top first.
    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// Returns the row a piece dropped into `col` would land in.
    ///
    /// `None` when the column is full or out of range.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.cells[row][col] == Cell::Empty)
    }

    /// Counts occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| **c != Cell::Empty)
            .count()
    }

    /// Sets the cell at `(row, col)`. Out-of-range coordinates are ignored.
    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        let mut out = String::new();
        for row in &self.cells {
            let line: Vec<&str> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => ".",
                    Cell::Occupied(Player::One) => "X",
                    Cell::Occupied(Player::Two) => "O",
                })
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out.push_str("0 1 2 3 4 5 6");
        out
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Drawn,
}

impl GameStatus {
    /// Whether the game has reached a terminal state.
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// One accepted move: the column played and who played it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    /// Column the piece was dropped into (0-6).
    pub column: usize,
    /// Player who moved.
    pub player: Player,
}

/// Complete game state.
///
/// Serializes through [`WireState`](crate::WireState), so every serde
/// consumer sees the canonical wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "crate::WireState", try_from = "crate::WireState")]
pub struct GameState {
    board: Board,
    current_player: Player,
    status: GameStatus,
    history: Vec<MoveRecord>,
}

impl GameState {
    /// Creates a new game: empty board, player 1 to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::One,
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }

    /// Assembles a state from parts. Consistency is the caller's concern.
    pub(crate) fn from_parts(
        board: Board,
        current_player: Player,
        status: GameStatus,
        history: Vec<MoveRecord>,
    ) -> Self {
        Self {
            board,
            current_player,
            status,
            history,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player whose turn is next.
    ///
    /// Once the game is over this is the player who made the final move.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Whether the game has ended.
    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// Returns the move history, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Drops the current player's piece at `(row, column)` (unchecked).
    pub(crate) fn place(&mut self, row: usize, column: usize) {
        let player = self.current_player;
        self.board.set(row, column, Cell::Occupied(player));
        self.history.push(MoveRecord { column, player });
    }

    pub(crate) fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    pub(crate) fn pass_turn(&mut self) {
        self.current_player = self.current_player.opponent();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
