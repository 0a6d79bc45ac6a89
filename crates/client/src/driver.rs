//! Carries out the requests a [`Session`] issues and feeds the replies back.
//!
//! A front end hands each [`Request`] to [`perform`] on its executor and passes
//! the resulting [`Completion`] to [`Session::complete`], which may answer with
//! a follow-up request.

use std::time::Duration;
use tracing::warn;

use crate::config::GameConfig;
use crate::error::ClientResult;
use crate::position::Position;
use crate::protocol::{MoveOutcome, NewGame};
use crate::r#move::Move;
use crate::service::GameService;
use crate::session::Session;
use crate::snapshot::{BoardSnapshot, GameId};

/// The session generation a request was issued under. Replies stamped with an
/// older generation belong to an abandoned game and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(pub(crate) u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub ticket: Ticket,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Releases `discard` (best effort) and creates a new game.
    CreateGame {
        config: GameConfig,
        discard: Option<GameId>,
    },
    ValidMoves {
        game_id: GameId,
        from: Position,
    },
    SubmitMove {
        game_id: GameId,
        mv: Move,
    },
    /// Waits, then reports that the scheduled AI turn is due. Issues no call.
    Wake { after: Duration },
    AiMove { game_id: GameId },
    FetchState { game_id: GameId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub ticket: Ticket,
    pub reply: Reply,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    GameCreated(ClientResult<NewGame>),
    ValidMoves {
        from: Position,
        result: ClientResult<Vec<Position>>,
    },
    MoveApplied(ClientResult<MoveOutcome>),
    AiTurnDue,
    AiMoved(ClientResult<MoveOutcome>),
    Synced(ClientResult<BoardSnapshot>),
}

/// Performs one request against the server.
pub async fn perform(service: &dyn GameService, request: Request) -> Completion {
    let reply = match request.action {
        Action::CreateGame { config, discard } => {
            if let Some(old) = discard {
                if let Err(err) = service.delete_game(&old).await {
                    warn!(game_id = %old, "could not release previous game: {err}");
                }
            }
            Reply::GameCreated(service.create_game(config).await)
        }
        Action::ValidMoves { game_id, from } => Reply::ValidMoves {
            from,
            result: service.valid_moves(&game_id, from).await,
        },
        Action::SubmitMove { game_id, mv } => {
            Reply::MoveApplied(service.submit_move(&game_id, mv).await)
        }
        Action::Wake { after } => {
            tokio::time::sleep(after).await;
            Reply::AiTurnDue
        }
        Action::AiMove { game_id } => Reply::AiMoved(service.request_ai_move(&game_id).await),
        Action::FetchState { game_id } => Reply::Synced(service.fetch_state(&game_id).await),
    };
    Completion {
        ticket: request.ticket,
        reply,
    }
}

/// Runs `request` and every follow-up it leads to, one at a time.
///
/// `on_step` sees the session just before each request is performed, so a
/// front end can show a local move before the AI's reply lands on top of it.
pub async fn drive(
    service: &dyn GameService,
    session: &mut Session,
    request: Option<Request>,
    mut on_step: impl FnMut(&Session, &Request),
) {
    let mut next = request;
    while let Some(request) = next {
        on_step(session, &request);
        let completion = perform(service, request).await;
        next = session.complete(completion);
    }
}
