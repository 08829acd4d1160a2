//! Player sessions: a seat in a game plus its event queue.

use crate::config::SessionConfig;
use crate::event::{Event, Play, Verdict};
use derive_more::Display;
use std::time::Duration;
use tictac_board::Mark;
use tokio::sync::broadcast;
use tracing::{debug, instrument, trace};

/// Opaque participant identifier, supplied by the transport.
pub type PlayerId = String;

/// Seat in a game, fixed by join order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, strum::EnumIter)]
pub enum Slot {
    /// First to join. Plays X and moves first.
    #[display("first")]
    First,
    /// Second to join. Plays O.
    #[display("second")]
    Second,
}

impl Slot {
    /// Mark placed by the player in this seat.
    pub fn mark(self) -> Mark {
        match self {
            Slot::First => Mark::X,
            Slot::Second => Mark::O,
        }
    }

    /// The opposing seat.
    pub fn other(self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

/// A player seated in a game.
///
/// Events are published on a broadcast queue: every attached observer gets
/// each event in order, and events published while nobody is attached are
/// dropped. Publishing never waits for an observer.
#[derive(Debug)]
pub struct PlayerSession {
    id: PlayerId,
    slot: Slot,
    events: broadcast::Sender<Event>,
    error_clear_delay: Duration,
}

impl PlayerSession {
    /// Creates a player for `slot` with an empty event queue.
    pub(crate) fn new(id: PlayerId, slot: Slot, config: &SessionConfig) -> Self {
        let (events, _) = broadcast::channel((*config.event_capacity()).max(1));
        Self {
            id,
            slot,
            events,
            error_clear_delay: config.error_clear_delay(),
        }
    }

    /// Player's identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Seat this player occupies.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Mark this player places.
    pub fn mark(&self) -> Mark {
        self.slot.mark()
    }

    /// Number of observers currently attached.
    pub fn observers(&self) -> usize {
        self.events.receiver_count()
    }

    /// Attaches a new observer. It receives events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Tells this player the game ended. Does not wait for delivery.
    #[instrument(skip(self), fields(player_id = %self.id))]
    pub fn notify_game_over(&self, verdict: Verdict) {
        self.publish(Event::GameOver(verdict));
    }

    pub(crate) fn notify_move(&self, play: Play) {
        self.publish(Event::Move(play));
    }

    pub(crate) fn notify_turn(&self, your_turn: bool) {
        self.publish(Event::TurnChange(your_turn));
    }

    /// Publishes `message` and schedules its clear after the configured delay.
    ///
    /// The clear runs on its own task and is dropped if nobody is listening by
    /// then. Outside a tokio runtime no clear is scheduled.
    #[instrument(skip(self, message), fields(player_id = %self.id))]
    pub(crate) fn report_error(&self, message: String) {
        self.publish(Event::Error(Some(message)));

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime, error will not be cleared");
            return;
        };
        let events = self.events.clone();
        let delay = self.error_clear_delay;
        let player_id = self.id.clone();
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if events.send(Event::Error(None)).is_err() {
                trace!(player_id, "No observer attached, error clear dropped");
            }
        });
    }

    fn publish(&self, event: Event) {
        if let Err(broadcast::error::SendError(event)) = self.events.send(event) {
            trace!(player_id = %self.id, ?event, "No observer attached, event dropped");
        }
    }
}
