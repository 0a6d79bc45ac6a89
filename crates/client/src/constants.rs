//! Pieces, colours and board dimensions as the game authority describes them.

use serde::{Deserialize, Serialize};

pub const BOARD_ROWS: u8 = 10;
pub const BOARD_COLS: u8 = 9;

/// The two sides. Red is the first player and sits at the bottom of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// Get the opponent of this side.
    pub fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Black => "Black",
        }
    }
}

/// The seven piece kinds. Anything else the authority sends decodes as `Unknown`
/// and is rejected when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    General,
    Advisor,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    #[serde(rename = "piece_type")]
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// The traditional character for this piece, or `None` for an unknown kind.
    pub fn glyph(self) -> Option<char> {
        let glyph = match (self.color, self.kind) {
            (Color::Red, PieceKind::General) => '帥',
            (Color::Red, PieceKind::Advisor) => '仕',
            (Color::Red, PieceKind::Elephant) => '相',
            (Color::Red, PieceKind::Horse) => '傌',
            (Color::Red, PieceKind::Chariot) => '俥',
            (Color::Red, PieceKind::Cannon) => '炮',
            (Color::Red, PieceKind::Soldier) => '兵',
            (Color::Black, PieceKind::General) => '將',
            (Color::Black, PieceKind::Advisor) => '士',
            (Color::Black, PieceKind::Elephant) => '象',
            (Color::Black, PieceKind::Horse) => '馬',
            (Color::Black, PieceKind::Chariot) => '車',
            (Color::Black, PieceKind::Cannon) => '砲',
            (Color::Black, PieceKind::Soldier) => '卒',
            (_, PieceKind::Unknown) => return None,
        };
        Some(glyph)
    }
}
