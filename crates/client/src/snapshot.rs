//! The authoritative game state as last reported by the server.
//!
//! The client never computes board state itself: every update replaces the
//! snapshot wholesale.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{BOARD_COLS, BOARD_ROWS, Color, Piece};
use crate::position::Position;

/// Opaque identifier the server hands out for a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type Grid = [[Option<Piece>; BOARD_COLS as usize]; BOARD_ROWS as usize];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    board: Grid,
    pub current_player: Color,
    pub status: String,
    pub is_game_over: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_checkmate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_stalemate: Option<bool>,
    #[serde(default, rename = "captured_pieces")]
    pub captured: Vec<Piece>,
}

impl BoardSnapshot {
    /// An empty, non-terminal board with `current_player` to move.
    pub fn new(current_player: Color, status: impl Into<String>) -> Self {
        Self {
            board: [[None; BOARD_COLS as usize]; BOARD_ROWS as usize],
            current_player,
            status: status.into(),
            is_game_over: false,
            is_checkmate: None,
            is_stalemate: None,
            captured: Vec::new(),
        }
    }

    pub fn with_piece(mut self, pos: Position, piece: Piece) -> Self {
        self.board[usize::from(pos.row())][usize::from(pos.col())] = Some(piece);
        self
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.board[usize::from(pos.row())][usize::from(pos.col())]
    }

    /// Occupied intersections, row by row.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(|pos| self.piece_at(pos).map(|piece| (pos, piece)))
    }

    /// True if `pos` holds a piece belonging to the side to move.
    pub fn is_movable(&self, pos: Position) -> bool {
        self.piece_at(pos)
            .is_some_and(|piece| piece.color == self.current_player)
    }
}
