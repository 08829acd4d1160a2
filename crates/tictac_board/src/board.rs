//! The 3x3 board.

use crate::rules;
use crate::types::{Mark, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// 3x3 tic-tac-toe board, indexed `[x][y]` with `x` the column and `y` the row.
///
/// Coordinates are a caller contract: [`Board::get`] and [`Board::set`] expect
/// `x, y < Board::SIZE`. Use [`Board::contains`] to validate untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    squares: [[Square; Board::SIZE]; Board::SIZE],
}

impl Board {
    /// Side length of the board.
    pub const SIZE: usize = 3;

    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `(x, y)` lies on the board.
    pub fn contains(x: usize, y: usize) -> bool {
        x < Self::SIZE && y < Self::SIZE
    }

    /// Gets the square at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Square {
        self.squares[x][y]
    }

    /// Places `mark` at `(x, y)`.
    ///
    /// The caller checks that the square is empty first; an occupied square is
    /// never overwritten.
    #[instrument(skip(self))]
    pub fn set(&mut self, x: usize, y: usize, mark: Mark) {
        let square = &mut self.squares[x][y];
        if *square == Square::Empty {
            *square = Square::Occupied(mark);
        }
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Square::Empty
    }

    /// Returns true when no empty squares remain.
    pub fn is_full(&self) -> bool {
        rules::is_full(self)
    }

    /// Returns the mark at `(x, y)` if it completes a line through that square.
    pub fn winner_at(&self, x: usize, y: usize) -> Option<Mark> {
        rules::winner_at(self, x, y)
    }

    /// Iterates over every square with its coordinates.
    pub fn squares(&self) -> impl Iterator<Item = (usize, usize, Square)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .flat_map(|(x, column)| column.iter().enumerate().map(move |(y, sq)| (x, y, *sq)))
    }

    /// Renders row `y` as three symbols, e.g. `X-O`.
    pub fn row(&self, y: usize) -> String {
        (0..Self::SIZE).map(|x| self.get(x, y).symbol()).collect()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..Self::SIZE {
            writeln!(
                f,
                " {} | {} | {}",
                self.get(0, y),
                self.get(1, y),
                self.get(2, y)
            )?;
            if y + 1 < Self::SIZE {
                writeln!(f, "---|---|---")?;
            }
        }
        Ok(())
    }
}
