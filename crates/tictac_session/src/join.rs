//! Join protocol: attaching an observer to a player and relaying its events.

use crate::error::SessionError;
use crate::event::{Event, Play, Verdict};
use crate::game::GameSession;
use crate::player::{PlayerSession, Slot};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Callbacks invoked by the relay loop, one per event kind.
///
/// Implementations turn session events into transport output. Every method
/// defaults to doing nothing.
pub trait Handlers: Send {
    /// A move was accepted.
    fn on_move(&mut self, _play: Play) {}

    /// The observer's turn state changed.
    fn on_turn_change(&mut self, _your_turn: bool) {}

    /// The game ended.
    fn on_game_over(&mut self, _verdict: Verdict) {}

    /// An action was rejected, or `None` when the message should be cleared.
    fn on_error(&mut self, _message: Option<&str>) {}
}

fn dispatch<H: Handlers>(handlers: &mut H, event: Event) {
    match event {
        Event::Move(play) => handlers.on_move(play),
        Event::TurnChange(your_turn) => handlers.on_turn_change(your_turn),
        Event::GameOver(verdict) => handlers.on_game_over(verdict),
        Event::Error(message) => handlers.on_error(message.as_deref()),
    }
}

impl GameSession {
    /// Maps a connecting identity to its player, seating it if it is new.
    #[instrument(skip(self), fields(game_id = %self.id()))]
    pub async fn join_or_resume(&self, player_id: &str) -> Result<Arc<PlayerSession>, SessionError> {
        if let Some(player) = self.get_player(player_id).await {
            info!("Resuming player");
            return Ok(player);
        }
        self.add_player(player_id).await
    }

    /// Relays `player`'s events to `handlers` until `cancel` fires.
    ///
    /// The first observer of the first-slot player consumes the start signal
    /// and is immediately told it is its turn; second-slot observers leave the
    /// signal for it. Cancelling only ends this
    /// loop; the player keeps its seat and can join again, though events
    /// published in between are not replayed.
    #[instrument(skip(self, player, handlers, cancel), fields(game_id = %self.id(), player_id = %player.id()))]
    pub async fn join_and_relay<H: Handlers>(
        &self,
        player: &PlayerSession,
        handlers: &mut H,
        cancel: CancellationToken,
    ) {
        let mut events = player.subscribe();
        info!(mark = %player.mark(), "Player joined the game");

        if player.slot() == Slot::First && self.take_started() {
            let your_turn = self.is_turn_of(player).await;
            info!(your_turn, "Starting new game with first observer");
            handlers.on_turn_change(your_turn);
        }

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!("Player disconnected");
                    return;
                }
                received = events.recv() => match received {
                    Ok(event) => dispatch(handlers, event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Observer fell behind, events dropped");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Event queue closed");
                        return;
                    }
                },
            }
        }
    }
}
