//! Server-sent-event rendering of a player's session events.

use axum::response::sse::Event as SseEvent;
use futures::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use tictac_session::{GameSession, Handlers, Play, PlayerSession, Verdict};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Name and payload of one SSE frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frame {
    pub(crate) name: String,
    pub(crate) data: String,
}

impl Frame {
    fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// `event{x}{y}` carrying the placed mark.
    pub(crate) fn play(play: Play) -> Self {
        Self::new(format!("event{}{}", play.x, play.y), play.mark.to_string())
    }

    pub(crate) fn turn(your_turn: bool) -> Self {
        let data = if your_turn {
            "your turn!"
        } else {
            "not your turn!"
        };
        Self::new("eventTurnNotifier", data)
    }

    pub(crate) fn game_over(verdict: Verdict) -> Self {
        let data = match verdict {
            Verdict::Win => "You Win!",
            Verdict::Loss => "You Lose!",
            Verdict::Draw => "game over!",
        };
        Self::new("eventGameOver", data)
    }

    /// Empty data clears the message on the client.
    pub(crate) fn error(message: Option<&str>) -> Self {
        Self::new("eventError", message.unwrap_or_default())
    }
}

impl From<Frame> for SseEvent {
    fn from(frame: Frame) -> Self {
        SseEvent::default().event(frame.name).data(frame.data)
    }
}

/// Forwards relay callbacks to the response stream.
struct SseRelay {
    frames: UnboundedSender<Frame>,
}

impl SseRelay {
    fn send(&self, frame: Frame) {
        if self.frames.send(frame).is_err() {
            debug!("Response stream gone, dropping frame");
        }
    }
}

impl Handlers for SseRelay {
    fn on_move(&mut self, play: Play) {
        self.send(Frame::play(play));
    }

    fn on_turn_change(&mut self, your_turn: bool) {
        self.send(Frame::turn(your_turn));
    }

    fn on_game_over(&mut self, verdict: Verdict) {
        self.send(Frame::game_over(verdict));
    }

    fn on_error(&mut self, message: Option<&str>) {
        self.send(Frame::error(message));
    }
}

/// Attaches an observer to `player` and returns its events as an SSE stream.
///
/// The relay task runs until the stream is dropped, which happens when the
/// client disconnects.
#[instrument(skip(game, player), fields(game_id = %game.id(), player_id = %player.id()))]
pub(crate) fn stream(
    game: Arc<GameSession>,
    player: Arc<PlayerSession>,
) -> impl Stream<Item = Result<SseEvent, Infallible>> {
    let (frames, rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    tokio::spawn(async move {
        let mut relay = SseRelay { frames };
        game.join_and_relay(&player, &mut relay, cancel).await;
    });

    futures::stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let frame = rx.recv().await?;
        Some((Ok(frame.into()), (rx, guard)))
    })
}
