//! JSON bodies exchanged with the game server, and how replies turn into results.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use crate::position::Position;
use crate::r#move::Move;
use crate::snapshot::{BoardSnapshot, GameId};

/// `{"board_state": {...}}`. The server also sends the game id and AI settings
/// alongside; those are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotEnvelope {
    pub board_state: BoardSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct NewGameReply {
    pub success: bool,
    pub game_id: Option<GameId>,
    pub state: Option<SnapshotEnvelope>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ValidMovesReply {
    pub valid_moves: Vec<Position>,
}

#[derive(Debug, Serialize)]
pub struct MoveRequest {
    pub from_pos: Position,
    pub to_pos: Position,
}

impl From<Move> for MoveRequest {
    fn from(mv: Move) -> Self {
        Self {
            from_pos: mv.from,
            to_pos: mv.to,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MoveReply {
    pub success: bool,
    pub state: Option<SnapshotEnvelope>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, rename = "move")]
    pub applied: Option<Move>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteReply {
    pub success: bool,
}

/// A freshly created game.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGame {
    pub game_id: GameId,
    pub snapshot: BoardSnapshot,
}

/// The board after a move was applied, and the move itself when known.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub snapshot: BoardSnapshot,
    pub applied: Option<Move>,
}

impl NewGameReply {
    pub fn into_result(self) -> ClientResult<NewGame> {
        match self {
            NewGameReply {
                success: true,
                game_id: Some(game_id),
                state: Some(state),
                ..
            } => Ok(NewGame {
                game_id,
                snapshot: state.board_state,
            }),
            NewGameReply { success: true, .. } => {
                Err(ClientError::service("game created without id or state"))
            }
            NewGameReply { error, .. } => Err(ClientError::service(
                error.unwrap_or_else(|| "failed to create game".to_string()),
            )),
        }
    }
}

impl MoveReply {
    /// `reject` turns the server's stated reason for a refusal into an error;
    /// a refusal without a reason is a plain service error.
    pub fn into_outcome(self, reject: fn(String) -> ClientError) -> ClientResult<MoveOutcome> {
        match self {
            MoveReply {
                success: true,
                state: Some(state),
                applied,
                ..
            } => Ok(MoveOutcome {
                snapshot: state.board_state,
                applied,
            }),
            MoveReply { success: true, .. } => {
                Err(ClientError::service("move accepted without a new state"))
            }
            MoveReply {
                error: Some(reason),
                ..
            } => Err(reject(reason)),
            MoveReply { .. } => Err(ClientError::service("request was not successful")),
        }
    }
}

pub fn illegal_move(reason: String) -> ClientError {
    ClientError::IllegalMove { reason }
}

pub fn engine_failure(reason: String) -> ClientError {
    ClientError::Engine { reason }
}
