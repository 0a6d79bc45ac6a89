//! Shared fixtures for the unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::config::GameConfig;
use crate::constants::{Color, Piece, PieceKind};
use crate::error::{ClientError, ClientResult};
use crate::position::Position;
use crate::protocol::{MoveOutcome, NewGame};
use crate::r#move::Move;
use crate::service::GameService;
use crate::snapshot::{BoardSnapshot, GameId};

pub fn pos(row: u8, col: u8) -> Position {
    Position::new(row, col).unwrap()
}

/// Generals and corner chariots only, red to move.
pub fn opening_snapshot() -> BoardSnapshot {
    BoardSnapshot::new(Color::Red, "Red's turn")
        .with_piece(pos(0, 0), Piece::new(Color::Black, PieceKind::Chariot))
        .with_piece(pos(0, 4), Piece::new(Color::Black, PieceKind::General))
        .with_piece(pos(9, 0), Piece::new(Color::Red, PieceKind::Chariot))
        .with_piece(pos(9, 4), Piece::new(Color::Red, PieceKind::General))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateGame(GameConfig),
    ValidMoves(GameId, Position),
    SubmitMove(GameId, Move),
    AiMove(GameId),
    FetchState(GameId),
    DeleteGame(GameId),
}

/// Answers each call with the next scripted reply and records what was asked.
#[derive(Default)]
pub struct ScriptedService {
    calls: Mutex<Vec<Call>>,
    new_games: Mutex<VecDeque<ClientResult<NewGame>>>,
    valid_moves: Mutex<VecDeque<ClientResult<Vec<Position>>>>,
    moves: Mutex<VecDeque<ClientResult<BoardSnapshot>>>,
    ai_moves: Mutex<VecDeque<ClientResult<BoardSnapshot>>>,
    delete_fails: Mutex<bool>,
}

impl ScriptedService {
    pub fn push_new_game(&self, id: &str, snapshot: BoardSnapshot) {
        self.new_games.lock().unwrap().push_back(Ok(NewGame {
            game_id: GameId::new(id),
            snapshot,
        }));
    }

    pub fn push_valid_moves(&self, moves: Vec<Position>) {
        self.valid_moves.lock().unwrap().push_back(Ok(moves));
    }

    pub fn push_move(&self, result: ClientResult<BoardSnapshot>) {
        self.moves.lock().unwrap().push_back(result);
    }

    pub fn push_ai_move(&self, result: ClientResult<BoardSnapshot>) {
        self.ai_moves.lock().unwrap().push_back(result);
    }

    pub fn fail_delete(&self) {
        *self.delete_fails.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| pred(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn next<T>(queue: &Mutex<VecDeque<ClientResult<T>>>) -> ClientResult<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(ClientError::Service("no scripted reply".to_string())))
}

#[async_trait]
impl GameService for ScriptedService {
    async fn create_game(&self, config: GameConfig) -> ClientResult<NewGame> {
        self.record(Call::CreateGame(config));
        next(&self.new_games)
    }

    async fn valid_moves(&self, game_id: &GameId, from: Position) -> ClientResult<Vec<Position>> {
        self.record(Call::ValidMoves(game_id.clone(), from));
        next(&self.valid_moves)
    }

    async fn submit_move(&self, game_id: &GameId, mv: Move) -> ClientResult<MoveOutcome> {
        self.record(Call::SubmitMove(game_id.clone(), mv));
        next(&self.moves).map(|snapshot| MoveOutcome {
            snapshot,
            applied: Some(mv),
        })
    }

    async fn request_ai_move(&self, game_id: &GameId) -> ClientResult<MoveOutcome> {
        self.record(Call::AiMove(game_id.clone()));
        next(&self.ai_moves).map(|snapshot| MoveOutcome {
            snapshot,
            applied: None,
        })
    }

    async fn fetch_state(&self, game_id: &GameId) -> ClientResult<BoardSnapshot> {
        self.record(Call::FetchState(game_id.clone()));
        Ok(opening_snapshot())
    }

    async fn delete_game(&self, game_id: &GameId) -> ClientResult<()> {
        self.record(Call::DeleteGame(game_id.clone()));
        if *self.delete_fails.lock().unwrap() {
            Err(ClientError::Service("game not found".to_string()))
        } else {
            Ok(())
        }
    }
}
