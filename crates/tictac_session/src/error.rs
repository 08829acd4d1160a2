//! Session error types.

use derive_more::{Display, Error};

/// Why a join or a move was refused.
///
/// Every variant is recoverable. Move errors are returned to the caller and
/// also published on the acting player's event queue, so a connected observer
/// can show them even when the move came in on another request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// Both seats are already taken.
    #[display("session already has 2 players")]
    SessionFull,

    /// The game has finished.
    #[display("game over")]
    GameOver,

    /// The second seat is still empty.
    #[display("waiting for an opponent to join")]
    AwaitingOpponent,

    /// The acting player is not the one to move.
    #[display("not your turn")]
    NotYourTurn,

    /// The coordinate is not on the board.
    #[display("position ({x}, {y}) is off the board")]
    OutOfBounds {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },

    /// The square already holds a mark.
    #[display("position ({x}, {y}) is taken")]
    CellTaken {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },
}
