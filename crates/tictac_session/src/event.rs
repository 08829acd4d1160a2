//! Events delivered to player observers.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tictac_board::Mark;

/// A mark placed on the board, as seen by both players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Play {
    /// The mark that was placed.
    pub mark: Mark,
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

/// One player's view of how the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Verdict {
    /// This player completed a line.
    #[display("win")]
    Win,
    /// The opponent completed a line.
    #[display("loss")]
    Loss,
    /// The board filled up.
    #[display("draw")]
    Draw,
}

/// Notification queued for a player.
///
/// A single ordered queue per player carries all kinds, so an observer sees
/// them in the order the coordinator produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A move was accepted (either player's).
    Move(Play),
    /// Whether it is now this player's turn.
    TurnChange(bool),
    /// The game ended.
    GameOver(Verdict),
    /// A rejected action, or `None` once the message should be cleared.
    Error(Option<String>),
}
