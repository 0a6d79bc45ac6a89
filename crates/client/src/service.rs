//! The game server: owner of the rules, move legality and the AI.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::error::{ClientError, ClientResult};
use crate::position::Position;
use crate::protocol::{
    DeleteReply, MoveOutcome, MoveReply, MoveRequest, NewGame, NewGameReply, SnapshotEnvelope,
    ValidMovesReply, engine_failure, illegal_move,
};
use crate::r#move::Move;
use crate::snapshot::{BoardSnapshot, GameId};

/// Every operation is one round trip. Nothing is retried.
#[async_trait]
pub trait GameService: Send + Sync {
    async fn create_game(&self, config: GameConfig) -> ClientResult<NewGame>;

    /// Legal destinations for the piece on `from`; possibly none.
    async fn valid_moves(&self, game_id: &GameId, from: Position) -> ClientResult<Vec<Position>>;

    async fn submit_move(&self, game_id: &GameId, mv: Move) -> ClientResult<MoveOutcome>;

    /// Asks the server to play one move for the side it controls.
    async fn request_ai_move(&self, game_id: &GameId) -> ClientResult<MoveOutcome>;

    async fn fetch_state(&self, game_id: &GameId) -> ClientResult<BoardSnapshot>;

    async fn delete_game(&self, game_id: &GameId) -> ClientResult<()>;
}

/// Talks JSON over HTTP to the game API.
pub struct HttpGameClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGameClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn game_url(&self, game_id: &GameId, suffix: &str) -> String {
        self.url(&format!("/game/{}{}", game_id, suffix))
    }
}

/// Decodes the body of a reply. Move endpoints report refusals inside a 200,
/// but a refusal with another status still carries a readable body.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|err| {
        if status.is_success() {
            ClientError::service(format!("malformed response: {err}"))
        } else {
            warn!(%status, "unreadable error body: {}", body);
            status_error(status)
        }
    })
}

fn status_error(status: StatusCode) -> ClientError {
    if status == StatusCode::NOT_FOUND {
        ClientError::service("game not found")
    } else {
        ClientError::service(format!("server returned {status}"))
    }
}

#[async_trait]
impl GameService for HttpGameClient {
    async fn create_game(&self, config: GameConfig) -> ClientResult<NewGame> {
        debug!(?config, "creating game");
        let response = self
            .http
            .post(self.url("/game/new"))
            .json(&config)
            .send()
            .await?;
        decode::<NewGameReply>(response).await?.into_result()
    }

    async fn valid_moves(&self, game_id: &GameId, from: Position) -> ClientResult<Vec<Position>> {
        let response = self
            .http
            .get(self.game_url(game_id, "/valid-moves"))
            .query(&[("row", from.row()), ("col", from.col())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }
        Ok(decode::<ValidMovesReply>(response).await?.valid_moves)
    }

    async fn submit_move(&self, game_id: &GameId, mv: Move) -> ClientResult<MoveOutcome> {
        debug!(%game_id, %mv, "submitting move");
        let response = self
            .http
            .post(self.game_url(game_id, "/move"))
            .json(&MoveRequest::from(mv))
            .send()
            .await?;
        let outcome = decode::<MoveReply>(response).await?.into_outcome(illegal_move)?;
        // The server does not echo a human move back, but we know what we sent.
        Ok(MoveOutcome {
            applied: outcome.applied.or(Some(mv)),
            ..outcome
        })
    }

    async fn request_ai_move(&self, game_id: &GameId) -> ClientResult<MoveOutcome> {
        debug!(%game_id, "requesting AI move");
        let response = self
            .http
            .post(self.game_url(game_id, "/ai-move"))
            .send()
            .await?;
        decode::<MoveReply>(response).await?.into_outcome(engine_failure)
    }

    async fn fetch_state(&self, game_id: &GameId) -> ClientResult<BoardSnapshot> {
        let response = self
            .http
            .get(self.game_url(game_id, "/state"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }
        Ok(decode::<SnapshotEnvelope>(response).await?.board_state)
    }

    async fn delete_game(&self, game_id: &GameId) -> ClientResult<()> {
        let response = self
            .http
            .delete(self.game_url(game_id, ""))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }
        match decode::<DeleteReply>(response).await? {
            DeleteReply { success: true } => Ok(()),
            DeleteReply { success: false } => Err(ClientError::service("game was not deleted")),
        }
    }
}
