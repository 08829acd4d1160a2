//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};

/// A mark placed on the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Mark {
    /// Placed by the first-slot player, who moves first.
    #[display("X")]
    X,
    /// Placed by the second-slot player.
    #[display("O")]
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Single-character symbol for this mark.
    pub fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Nothing placed yet.
    #[default]
    Empty,
    /// Square holds a mark.
    Occupied(Mark),
}

impl Square {
    /// Symbol used when rendering: `-` for empty squares.
    pub fn symbol(self) -> char {
        match self {
            Square::Empty => '-',
            Square::Occupied(mark) => mark.symbol(),
        }
    }

    /// Returns the mark in this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Outcome {
    /// A mark completed a line.
    #[display("{_0} wins")]
    Winner(Mark),
    /// The board filled up with no line completed.
    #[display("draw")]
    Draw,
}

impl Outcome {
    /// Returns the winning mark if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Winner(mark) => Some(*mark),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}
