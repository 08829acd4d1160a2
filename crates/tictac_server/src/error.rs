//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::Display;
use tictac_session::SessionError;
use tracing::warn;

/// Failure of an HTTP request, rendered as a status code and plain-text body.
#[derive(Debug, Display)]
pub enum ApiError {
    /// No session is registered under the requested id.
    #[display("no game with ID {_0}")]
    GameNotFound(String),

    /// The request carries no `Player` cookie.
    #[display("missing player ID")]
    MissingIdentity,

    /// The `Player` cookie does not belong to a player of this game.
    #[display("player {_0} has not joined this game")]
    UnknownPlayer(String),

    /// Malformed request parameters.
    #[display("{_0}")]
    BadRequest(String),

    /// The session refused the action.
    #[display("{_0}")]
    Session(SessionError),

    /// Something went wrong on our side.
    #[display("internal error: {_0}")]
    Internal(String),
}

impl std::error::Error for ApiError {}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

impl ApiError {
    /// Status code this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::GameNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MissingIdentity | ApiError::UnknownPlayer(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Session(SessionError::SessionFull) => StatusCode::CONFLICT,
            ApiError::Session(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(%status, error = %self, "Request failed");
        (status, self.to_string()).into_response()
    }
}
