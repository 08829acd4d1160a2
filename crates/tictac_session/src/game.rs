//! Game session coordinator.
//!
//! A [`GameSession`] owns the board and both seats behind one lock. Every move
//! takes that lock, so moves from the two players are applied one at a time in
//! arrival order, and the events each move produces are queued before the next
//! move can start.

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::event::{Play, Verdict};
use crate::player::{PlayerId, PlayerSession, Slot};
use derive_more::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tictac_board::{Board, Mark, Outcome, Square};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session, used as the external routing key.
pub type GameId = String;

/// Lifecycle of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    /// Fewer than two players have joined.
    #[display("awaiting players")]
    AwaitingPlayers,
    /// Both seats are filled and no move has been played.
    #[display("ready")]
    Ready,
    /// At least one move has been played.
    #[display("in progress")]
    InProgress,
    /// The game ended. Terminal.
    #[display("finished ({_0})")]
    Finished(Outcome),
}

#[derive(Debug)]
struct GameState {
    board: Board,
    first: Option<Arc<PlayerSession>>,
    second: Option<Arc<PlayerSession>>,
    up_next: Slot,
    outcome: Option<Outcome>,
    moves: usize,
    last_activity: Instant,
}

impl GameState {
    fn new() -> Self {
        Self {
            board: Board::new(),
            first: None,
            second: None,
            up_next: Slot::First,
            outcome: None,
            moves: 0,
            last_activity: Instant::now(),
        }
    }

    fn seat(&self, slot: Slot) -> Option<&Arc<PlayerSession>> {
        match slot {
            Slot::First => self.first.as_ref(),
            Slot::Second => self.second.as_ref(),
        }
    }

    fn seat_mut(&mut self, slot: Slot) -> &mut Option<Arc<PlayerSession>> {
        match slot {
            Slot::First => &mut self.first,
            Slot::Second => &mut self.second,
        }
    }

    fn players(&self) -> impl Iterator<Item = &Arc<PlayerSession>> {
        self.first.iter().chain(self.second.iter())
    }

    fn find(&self, player_id: &str) -> Option<&Arc<PlayerSession>> {
        self.players().find(|p| p.id() == player_id)
    }

    /// True only for the seated player itself, not a namesake from another game.
    fn is_turn_of(&self, player: &PlayerSession) -> bool {
        self.outcome.is_none()
            && self
                .seat(self.up_next)
                .is_some_and(|current| std::ptr::eq(current.as_ref(), player))
    }

    fn phase(&self) -> Phase {
        match self.outcome {
            Some(outcome) => Phase::Finished(outcome),
            None if self.second.is_none() => Phase::AwaitingPlayers,
            None if self.moves == 0 => Phase::Ready,
            None => Phase::InProgress,
        }
    }

    /// Checks a move in order: game over, missing opponent, turn, bounds, square.
    fn check_move(&self, player: &PlayerSession, x: usize, y: usize) -> Result<(), SessionError> {
        if self.outcome.is_some() {
            return Err(SessionError::GameOver);
        }
        if self.second.is_none() {
            return Err(SessionError::AwaitingOpponent);
        }
        if !self.is_turn_of(player) {
            return Err(SessionError::NotYourTurn);
        }
        if !Board::contains(x, y) {
            return Err(SessionError::OutOfBounds { x, y });
        }
        if !self.board.is_empty(x, y) {
            return Err(SessionError::CellTaken { x, y });
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// A game between two players.
#[derive(Debug)]
pub struct GameSession {
    id: GameId,
    config: SessionConfig,
    state: Mutex<GameState>,
    started: AtomicBool,
}

impl GameSession {
    /// Creates a game with an empty board and no players.
    #[instrument(skip(config))]
    pub fn new(id: GameId, config: SessionConfig) -> Self {
        info!(game_id = %id, "Creating new game session");
        Self {
            id,
            config,
            state: Mutex::new(GameState::new()),
            started: AtomicBool::new(false),
        }
    }

    /// Game identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Seats a player: first seat if free, else second, else `SessionFull`.
    ///
    /// An identifier that already joined gets its existing player back.
    #[instrument(skip(self, player_id), fields(game_id = %self.id))]
    pub async fn add_player(
        &self,
        player_id: impl Into<PlayerId>,
    ) -> Result<Arc<PlayerSession>, SessionError> {
        let player_id = player_id.into();
        let mut state = self.state.lock().await;

        if let Some(existing) = state.find(&player_id) {
            debug!(player_id, "Player already seated");
            return Ok(Arc::clone(existing));
        }

        let slot = match (&state.first, &state.second) {
            (None, _) => Slot::First,
            (Some(_), None) => Slot::Second,
            (Some(_), Some(_)) => {
                warn!(player_id, "Session already has 2 players");
                return Err(SessionError::SessionFull);
            }
        };

        let player = Arc::new(PlayerSession::new(player_id, slot, &self.config));
        *state.seat_mut(slot) = Some(Arc::clone(&player));
        state.touch();

        info!(
            player_id = %player.id(),
            %slot,
            mark = %player.mark(),
            "Player added to the game"
        );
        Ok(player)
    }

    /// Gets the seated player with the given ID. Never seats anyone.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub async fn get_player(&self, player_id: &str) -> Option<Arc<PlayerSession>> {
        let state = self.state.lock().await;
        let player = state.find(player_id).cloned();
        if player.is_none() {
            debug!("Player not found in session");
        }
        player
    }

    /// Plays `player`'s mark at `(x, y)` and returns the mark placed.
    ///
    /// Rejections are returned and also published on `player`'s queue. On
    /// success the mover loses the turn before the board changes and both
    /// players get the move. A full board then ends in a draw, even when the
    /// last mark completed a line; otherwise a line wins, or the opponent gets
    /// the turn.
    #[instrument(skip(self, player), fields(game_id = %self.id, player_id = %player.id()))]
    pub async fn play(&self, player: &PlayerSession, x: usize, y: usize) -> Result<Mark, SessionError> {
        let mut state = self.state.lock().await;

        if let Err(err) = state.check_move(player, x, y) {
            warn!(error = %err, "Move rejected");
            player.report_error(err.to_string());
            return Err(err);
        }

        let mark = state.up_next.mark();
        player.notify_turn(false);

        state.board.set(x, y, mark);
        state.up_next = state.up_next.other();
        state.moves += 1;
        state.touch();

        let play = Play::new(mark, x, y);
        for seated in state.players() {
            seated.notify_move(play);
        }

        let opponent = state.seat(player.slot().other()).cloned();
        if state.board.is_full() {
            state.outcome = Some(Outcome::Draw);
            for seated in state.players() {
                seated.notify_game_over(Verdict::Draw);
            }
            info!(moves = state.moves, "Game drawn");
        } else if state.board.winner_at(x, y) == Some(mark) {
            state.outcome = Some(Outcome::Winner(mark));
            player.notify_game_over(Verdict::Win);
            if let Some(opponent) = &opponent {
                opponent.notify_game_over(Verdict::Loss);
            }
            info!(%mark, moves = state.moves, "Game won");
        } else if let Some(opponent) = &opponent {
            opponent.notify_turn(true);
            debug!(%mark, x, y, "Move accepted");
        }

        Ok(mark)
    }

    /// Square at `(x, y)`; bounds are the caller's contract.
    pub async fn get(&self, x: usize, y: usize) -> Square {
        self.state.lock().await.board.get(x, y)
    }

    /// Snapshot of the board.
    pub async fn board(&self) -> Board {
        self.state.lock().await.board.clone()
    }

    /// Mark of the player whose turn it is.
    pub async fn up_next(&self) -> Mark {
        self.state.lock().await.up_next.mark()
    }

    /// How the game ended, if it has.
    pub async fn outcome(&self) -> Option<Outcome> {
        self.state.lock().await.outcome
    }

    /// Current lifecycle phase.
    pub async fn phase(&self) -> Phase {
        self.state.lock().await.phase()
    }

    /// Seated players, first seat first.
    pub async fn players(&self) -> Vec<Arc<PlayerSession>> {
        self.state.lock().await.players().cloned().collect()
    }

    /// Time since the last join or accepted move.
    pub async fn idle_for(&self) -> Duration {
        self.state.lock().await.last_activity.elapsed()
    }

    /// True if it is currently `player`'s turn and the game is not over.
    pub async fn is_turn_of(&self, player: &PlayerSession) -> bool {
        self.state.lock().await.is_turn_of(player)
    }

    /// Observers currently attached to either player.
    pub async fn observers(&self) -> usize {
        self.state.lock().await.players().map(|p| p.observers()).sum()
    }

    /// Consumes the one-shot start signal. True only for the first caller.
    pub(crate) fn take_started(&self) -> bool {
        !self.started.swap(true, Ordering::AcqRel)
    }
}
