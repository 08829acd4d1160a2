//! Live two-player tic-tac-toe sessions.
//!
//! This crate is the session engine behind the server: it serializes moves
//! against a shared board, fans events out to both players, and relays those
//! events to whichever observers are connected.
//!
//! # Architecture
//!
//! - **Player session**: a seat in a game plus its ordered event queue
//! - **Game session**: the coordinator owning the board and both seats
//! - **Join protocol**: the per-observer relay loop
//! - **Registry**: process-wide map from game id to session
//!
//! # Example
//!
//! ```no_run
//! use tictac_session::{Handlers, Play, SessionConfig, SessionManager};
//! use tokio_util::sync::CancellationToken;
//!
//! struct Printer;
//!
//! impl Handlers for Printer {
//!     fn on_move(&mut self, play: Play) {
//!         println!("{} at ({}, {})", play.mark, play.x, play.y);
//!     }
//! }
//!
//! # async fn example() -> Result<(), tictac_session::SessionError> {
//! let sessions = SessionManager::new(SessionConfig::default());
//! let game = sessions.create().await;
//! let alice = game.add_player("alice").await?;
//!
//! let cancel = CancellationToken::new();
//! game.join_and_relay(&alice, &mut Printer, cancel).await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod event;
mod game;
mod ids;
mod join;
mod player;
mod registry;

pub use config::SessionConfig;
pub use error::SessionError;
pub use event::{Event, Play, Verdict};
pub use game::{GameId, GameSession, Phase};
pub use ids::generate_id;
pub use join::Handlers;
pub use player::{PlayerId, PlayerSession, Slot};
pub use registry::SessionManager;

pub use tictac_board::{Board, Mark, Outcome, Square};
