//! HTTP routes.

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::identity::{self, PLAYER_ID_LENGTH};
use crate::relay;
use axum::body::Body;
use axum::extract::{Form, Query, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::sse::{KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tictac_session::{Board, GameSession, Mark, SessionManager, generate_id};
use tower::ServiceBuilder;
use tracing::{info, instrument};

/// Query parameter naming the game.
pub const GAME_ID_PARAM: &str = "gameID";

/// State shared by every handler.
#[derive(Debug, Clone, derive_new::new)]
pub struct AppState {
    sessions: SessionManager,
    config: Arc<ServerConfig>,
}

#[derive(Debug, Deserialize)]
struct GameQuery {
    #[serde(rename = "gameID")]
    game_id: Option<String>,
}

impl GameQuery {
    fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct MoveForm {
    x: String,
    y: String,
}

/// Read-only snapshot of a game for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    /// Session identifier.
    pub game_id: String,
    /// Human-readable lifecycle phase.
    pub phase: String,
    /// Mark whose turn it is.
    pub up_next: Mark,
    /// One string per row, top to bottom, e.g. `X-O`.
    pub rows: Vec<String>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(join_or_create))
        .route("/tictactoe", get(events).post(make_move))
        .route("/board", get(board))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

async fn lookup(state: &AppState, query: &GameQuery) -> Result<Arc<GameSession>, ApiError> {
    let id = query.game_id().unwrap_or_default();
    state
        .sessions
        .lookup(id)
        .await
        .ok_or_else(|| ApiError::GameNotFound(id.to_string()))
}

fn coordinate(value: &str, name: &str) -> Result<usize, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid value for '{}'", name)))
}

/// Creates a game and redirects to it, or seats the caller in an existing one.
#[instrument(skip(state, query, headers), fields(game_id = query.game_id()))]
async fn join_or_create(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if query.game_id().is_none() {
        let game = state.sessions.create().await;
        let location = format!("/?{}={}", GAME_ID_PARAM, game.id());
        info!(game_id = %game.id(), "Redirecting to new game");
        return Ok((StatusCode::FOUND, [(LOCATION, location)]).into_response());
    }

    let game = lookup(&state, &query).await?;
    let known = identity::player_id(&headers);
    let player_id = known
        .clone()
        .unwrap_or_else(|| generate_id(PLAYER_ID_LENGTH));
    let player = game.join_or_resume(&player_id).await?;

    let page = format!(
        "Game {}\nYou are {}\nStatus: {}\n\n{}",
        game.id(),
        player.mark(),
        game.phase().await,
        game.board().await
    );
    info!(player_id = %player.id(), mark = %player.mark(), "Joined game");

    if known.is_some() {
        return Ok(page.into_response());
    }
    let cookie = identity::cookie(player.id(), *state.config.cookie_max_age_secs())?;
    Ok(([(SET_COOKIE, cookie)], page).into_response())
}

/// Streams the caller's game events until it disconnects.
#[instrument(skip(state, query, headers), fields(game_id = query.game_id()))]
async fn events(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, ApiError> {
    let game = lookup(&state, &query).await?;
    let player_id = identity::player_id(&headers).ok_or(ApiError::MissingIdentity)?;
    let player = game.join_or_resume(&player_id).await?;
    info!(player_id = %player.id(), "Opening event stream");

    Ok(Sse::new(relay::stream(game, player)).keep_alive(KeepAlive::default()))
}

/// Applies a move; answers with the placed mark, or the square as it stands.
#[instrument(skip(state, query, headers, form), fields(game_id = query.game_id()))]
async fn make_move(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
    headers: HeaderMap,
    Form(form): Form<MoveForm>,
) -> Result<Response, ApiError> {
    let game = lookup(&state, &query).await?;
    let player_id = identity::player_id(&headers).ok_or(ApiError::MissingIdentity)?;
    let x = coordinate(&form.x, "x")?;
    let y = coordinate(&form.y, "y")?;
    info!(player_id = %player_id, x, y, "Received move");

    let player = game
        .get_player(&player_id)
        .await
        .ok_or(ApiError::UnknownPlayer(player_id))?;

    match game.play(&player, x, y).await {
        Ok(mark) => Ok((StatusCode::OK, mark.to_string()).into_response()),
        // Off the board there is no square to answer with.
        Err(err) if !Board::contains(x, y) => Err(err.into()),
        Err(err) => {
            info!(error = %err, "Move rejected");
            let square = game.get(x, y).await;
            Ok((StatusCode::BAD_REQUEST, square.to_string()).into_response())
        }
    }
}

/// JSON snapshot of the board.
#[instrument(skip(state, query), fields(game_id = query.game_id()))]
async fn board(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
) -> Result<Json<BoardView>, ApiError> {
    let game = lookup(&state, &query).await?;
    let board = game.board().await;

    Ok(Json(BoardView {
        game_id: game.id().to_string(),
        phase: game.phase().await.to_string(),
        up_next: game.up_next().await,
        rows: (0..Board::SIZE).map(|y| board.row(y)).collect(),
    }))
}
