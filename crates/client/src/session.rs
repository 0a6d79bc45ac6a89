//! The interaction state machine.
//!
//! `Session` owns everything the client knows about the current game and
//! turns clicks and button presses into requests for the server:
//! - `new_game`, `click`, `request_ai_move` and `resync` are the inputs. Each
//!   may return a [`Request`] for the front end to perform.
//! - `complete` takes the reply to a request, updates the state and may ask
//!   for a follow-up (the deferred AI turn after a local move).
//!
//! The session itself never blocks or touches the network, so every
//! transition can be exercised synchronously.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::constants::Color;
use crate::driver::{Action, Completion, Reply, Request, Ticket};
use crate::error::{ClientError, ClientResult};
use crate::position::Position;
use crate::protocol::{MoveOutcome, NewGame};
use crate::r#move::Move;
use crate::snapshot::{BoardSnapshot, GameId};
use crate::status::StatusLine;

/// Where the session is, derived from its state on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoGame,
    AwaitingInput,
    PieceSelected,
    AiTurn,
    GameOver,
}

/// A selected piece and where it may go. Both are set and cleared together.
#[derive(Debug, Clone, PartialEq)]
struct Selection {
    from: Position,
    candidates: Vec<Position>,
}

/// Progress of the server's reply to a local move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AiTask {
    Idle,
    /// A wake-up is pending; the AI has not been asked yet.
    Scheduled,
    InFlight,
}

pub struct Session {
    config: GameConfig,
    ai_move_delay: Duration,
    generation: u64,
    game_id: Option<GameId>,
    snapshot: Option<BoardSnapshot>,
    selection: Option<Selection>,
    last_move: Option<Move>,
    status: StatusLine,
    // A local round trip (game creation, selection, move, refresh) is outstanding.
    awaiting_reply: bool,
    ai_task: AiTask,
}

impl Session {
    pub fn new(config: GameConfig, ai_move_delay: Duration) -> Self {
        Self {
            config,
            ai_move_delay,
            generation: 0,
            game_id: None,
            snapshot: None,
            selection: None,
            last_move: None,
            status: StatusLine::default(),
            awaiting_reply: false,
            ai_task: AiTask::Idle,
        }
    }

    // --- Inputs ---

    /// Abandons the current game, including any reply still on its way, and
    /// asks for a new one.
    pub fn new_game(&mut self) -> Request {
        self.generation += 1;
        let discard = self.game_id.take();
        self.snapshot = None;
        self.selection = None;
        self.last_move = None;
        self.ai_task = AiTask::Idle;
        self.awaiting_reply = true;
        self.status = StatusLine::message("Creating new game...");
        info!(generation = self.generation, "starting new game");
        self.request(Action::CreateGame {
            config: self.config,
            discard,
        })
    }

    /// Handles a click on `pos`.
    pub fn click(&mut self, pos: Position) -> Option<Request> {
        if self.awaiting_reply {
            debug!(%pos, "click ignored while waiting for the server");
            return None;
        }
        if !self.is_local_turn() {
            return None;
        }
        let game_id = self.game_id.clone()?;

        if let Some(selection) = self.selection.take() {
            if !selection.candidates.contains(&pos) {
                debug!(from = %selection.from, %pos, "deselected");
                return None;
            }
            let mv = Move::new(selection.from, pos);
            // Kept until the server answers, so a refused move leaves it in place.
            self.selection = Some(selection);
            self.awaiting_reply = true;
            self.status = StatusLine::message("Making move...");
            return Some(self.request(Action::SubmitMove { game_id, mv }));
        }

        let movable = self
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.is_movable(pos));
        if !movable {
            return None;
        }
        self.awaiting_reply = true;
        Some(self.request(Action::ValidMoves { game_id, from: pos }))
    }

    /// Asks the server to move for its side, if that is possible right now.
    pub fn request_ai_move(&mut self) -> Option<Request> {
        if !self.is_ai_turn_available() {
            return None;
        }
        let game_id = self.game_id.clone()?;
        Some(self.start_ai_move(game_id))
    }

    /// Re-reads the game from the server, discarding any selection.
    pub fn resync(&mut self) -> Option<Request> {
        if self.awaiting_reply {
            return None;
        }
        let game_id = self.game_id.clone()?;
        self.awaiting_reply = true;
        Some(self.request(Action::FetchState { game_id }))
    }

    /// Applies the reply to an earlier request.
    pub fn complete(&mut self, completion: Completion) -> Option<Request> {
        if completion.ticket != self.ticket() {
            debug!(ticket = ?completion.ticket, "dropping reply for an abandoned game");
            return None;
        }
        match completion.reply {
            Reply::GameCreated(result) => self.handle_game_created(result),
            Reply::ValidMoves { from, result } => self.handle_valid_moves(from, result),
            Reply::MoveApplied(result) => self.handle_move_applied(result),
            Reply::AiTurnDue => self.handle_ai_turn_due(),
            Reply::AiMoved(result) => self.handle_ai_moved(result),
            Reply::Synced(result) => self.handle_synced(result),
        }
    }

    // --- Queries ---

    pub fn phase(&self) -> Phase {
        match &self.snapshot {
            None => Phase::NoGame,
            Some(snapshot) if snapshot.is_game_over => Phase::GameOver,
            Some(snapshot) if !self.config.is_local(snapshot.current_player) => Phase::AiTurn,
            Some(_) if self.selection.is_some() => Phase::PieceSelected,
            Some(_) => Phase::AwaitingInput,
        }
    }

    /// Whether the AI may be asked to move: it is the server's side to move,
    /// the game is still running, and no AI request is scheduled or outstanding.
    pub fn is_ai_turn_available(&self) -> bool {
        self.ai_task == AiTask::Idle && self.is_ai_side_to_move()
    }

    /// Whether clicks on the board are currently meaningful.
    pub fn is_local_turn(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|snapshot| {
            !snapshot.is_game_over && self.config.is_local(snapshot.current_player)
        })
    }

    pub fn is_waiting(&self) -> bool {
        self.awaiting_reply || self.ai_task != AiTask::Idle
    }

    pub fn game_id(&self) -> Option<&GameId> {
        self.game_id.as_ref()
    }

    pub fn snapshot(&self) -> Option<&BoardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn selected(&self) -> Option<Position> {
        self.selection.as_ref().map(|selection| selection.from)
    }

    pub fn candidates(&self) -> &[Position] {
        self.selection
            .as_ref()
            .map_or(&[], |selection| selection.candidates.as_slice())
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn ticket(&self) -> Ticket {
        Ticket(self.generation)
    }

    // --- Reply handlers ---

    fn handle_game_created(&mut self, result: ClientResult<NewGame>) -> Option<Request> {
        self.awaiting_reply = false;
        match result {
            Ok(game) => {
                info!(game_id = %game.game_id, "game created");
                self.game_id = Some(game.game_id);
                self.apply_snapshot(game.snapshot);
            }
            Err(err) => self.report("Error creating game", err),
        }
        None
    }

    fn handle_valid_moves(
        &mut self,
        from: Position,
        result: ClientResult<Vec<Position>>,
    ) -> Option<Request> {
        self.awaiting_reply = false;
        match result {
            Ok(candidates) => {
                debug!(%from, count = candidates.len(), "piece selected");
                self.selection = Some(Selection { from, candidates });
            }
            Err(err) => self.report("Error getting valid moves", err),
        }
        None
    }

    fn handle_move_applied(&mut self, result: ClientResult<MoveOutcome>) -> Option<Request> {
        self.awaiting_reply = false;
        match result {
            Ok(outcome) => {
                self.apply_outcome(outcome);
                if self.is_ai_side_to_move() {
                    // Lets the local move show before the reply lands on top of it.
                    self.ai_task = AiTask::Scheduled;
                    return Some(self.request(Action::Wake {
                        after: self.ai_move_delay,
                    }));
                }
            }
            Err(err) => self.report("Error", err),
        }
        None
    }

    fn handle_ai_turn_due(&mut self) -> Option<Request> {
        if self.ai_task != AiTask::Scheduled {
            return None;
        }
        self.ai_task = AiTask::Idle;
        if !self.is_ai_side_to_move() {
            return None;
        }
        let game_id = self.game_id.clone()?;
        Some(self.start_ai_move(game_id))
    }

    fn handle_ai_moved(&mut self, result: ClientResult<MoveOutcome>) -> Option<Request> {
        if self.ai_task != AiTask::InFlight {
            return None;
        }
        self.ai_task = AiTask::Idle;
        match result {
            Ok(outcome) => self.apply_outcome(outcome),
            Err(err) => self.report("AI Error", err),
        }
        None
    }

    fn handle_synced(&mut self, result: ClientResult<BoardSnapshot>) -> Option<Request> {
        self.awaiting_reply = false;
        match result {
            Ok(snapshot) => self.apply_snapshot(snapshot),
            Err(err) => self.report("Error refreshing game", err),
        }
        None
    }

    // --- Helpers ---

    fn request(&self, action: Action) -> Request {
        Request {
            ticket: self.ticket(),
            action,
        }
    }

    fn start_ai_move(&mut self, game_id: GameId) -> Request {
        self.ai_task = AiTask::InFlight;
        self.status = StatusLine::message("AI is thinking...");
        self.request(Action::AiMove { game_id })
    }

    fn is_ai_side_to_move(&self) -> bool {
        match (&self.snapshot, self.config.ai_side()) {
            (Some(snapshot), Some(side)) => !snapshot.is_game_over && snapshot.current_player == side,
            _ => false,
        }
    }

    fn apply_outcome(&mut self, outcome: MoveOutcome) {
        if let Some(mv) = outcome.applied {
            self.last_move = Some(mv);
        }
        self.apply_snapshot(outcome.snapshot);
    }

    /// Replaces the snapshot wholesale. Any selection refers to the old board.
    fn apply_snapshot(&mut self, snapshot: BoardSnapshot) {
        self.selection = None;
        self.status = StatusLine::of_snapshot(&snapshot);
        if snapshot.is_game_over {
            info!(status = %snapshot.status, "game over");
        } else {
            debug!(to_move = snapshot.current_player.name(), "snapshot updated");
        }
        self.snapshot = Some(snapshot);
    }

    fn report(&mut self, context: &str, err: ClientError) {
        warn!("{context}: {err}");
        self.status = StatusLine::message(format!("{context}: {err}"));
    }
}

/// The side a local player controls when only one side is local.
pub fn local_side(config: &GameConfig) -> Option<Color> {
    config.ai_side().map(Color::opponent)
}
