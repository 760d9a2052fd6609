//! Game rules for connect four.
//!
//! Pure functions over a [`Board`](crate::Board). The engine composes them
//! after each placement; they never mutate anything.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::is_winning_placement;
