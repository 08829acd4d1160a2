//! Game rules for tic-tac-toe.
//!
//! Pure functions evaluating a board. Rules are kept apart from board storage
//! so the coordinator can call them directly after a move.

mod draw;
mod win;

pub use draw::is_full;
pub use win::winner_at;
