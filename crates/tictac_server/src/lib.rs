//! HTTP front end for live tic-tac-toe sessions.
//!
//! Thin transport glue around [`tictac_session`]:
//!
//! - `GET /` creates a game or joins one, issuing a `Player` identity cookie
//! - `GET /tictactoe` streams the player's events as server-sent events
//! - `POST /tictactoe` submits a move
//! - `GET /board` returns a JSON snapshot of the board
//!
//! All game rules live in the session crate; this crate only maps requests
//! to session operations and session events to SSE frames.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod identity;
mod relay;
mod routes;
mod sweeper;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use identity::PLAYER_COOKIE;
pub use routes::{AppState, BoardView, GAME_ID_PARAM, router};
pub use sweeper::spawn_sweeper;

use tictac_session::SessionManager;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Runs the server until Ctrl-C.
#[instrument(skip(config), fields(host = %config.host(), port = *config.port()))]
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let sessions = SessionManager::new(config.session().clone());
    let shutdown = CancellationToken::new();
    let sweeper = spawn_sweeper(
        sessions.clone(),
        config.session_ttl(),
        config.sweep_interval(),
        shutdown.clone(),
    );

    let listener = TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(address = %listener.local_addr()?, "Server ready");

    let app = router(AppState::new(sessions, config.into()));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, shutting down sweeper");
    shutdown.cancel();
    sweeper.await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
