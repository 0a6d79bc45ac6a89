//! Error types for talking to the game server and drawing the board.

use crate::position::Position;

/// Errors returned by a round trip to the game server.
///
/// Errors travel inside UI messages, so they are `Clone` and keep only the
/// rendered text of lower level failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The server could not be reached or the connection failed midway.
    #[error("server unreachable: {0}")]
    Transport(String),

    /// The server answered, but not with a usable success.
    #[error("{0}")]
    Service(String),

    /// The server refused a move.
    #[error("{reason}")]
    IllegalMove { reason: String },

    /// The server could not produce an AI move.
    #[error("{reason}")]
    Engine { reason: String },
}

impl ClientError {
    pub(crate) fn service(message: impl Into<String>) -> Self {
        ClientError::Service(message.into())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Service(format!("malformed response: {err}"))
        } else if let Some(status) = err.status() {
            ClientError::Service(format!("server returned {status}"))
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// Result type alias for server round trips.
pub type ClientResult<T> = Result<T, ClientError>;

/// A snapshot that cannot be drawn. This is a data error, retrying will not help.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("unknown piece kind at {0}")]
    UnknownPieceKind(Position),
}
