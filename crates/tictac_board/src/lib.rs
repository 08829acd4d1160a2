//! Tic-tac-toe board logic.
//!
//! Pure, synchronous building blocks used by the session engine:
//!
//! - [`Board`]: the 3x3 grid, indexed `[x][y]`
//! - [`Mark`] / [`Square`]: what a player places and what a square holds
//! - [`Outcome`]: how a finished game ended
//!
//! Win detection is localized: [`Board::winner_at`] only inspects the lines
//! running through the square that was just played.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod rules;
mod types;

pub use board::Board;
pub use rules::{is_full, winner_at};
pub use types::{Mark, Outcome, Square};
