//! Board intersections and the mapping between them and pixel space.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{BOARD_COLS, BOARD_ROWS};

/// A board intersection. Row 0 is the top (Black's back rank), row 9 the bottom.
///
/// On the wire a position is a two element array `[row, col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i64; 2]", into = "[u8; 2]")]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Returns `None` if `(row, col)` lies off the board.
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_ROWS && col < BOARD_COLS {
            Some(Self { row, col })
        } else {
            None
        }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// Every intersection, row by row.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_ROWS).flat_map(|row| (0..BOARD_COLS).map(move |col| Position { row, col }))
    }
}

impl TryFrom<[i64; 2]> for Position {
    type Error = String;

    fn try_from([row, col]: [i64; 2]) -> Result<Self, Self::Error> {
        u8::try_from(row)
            .ok()
            .zip(u8::try_from(col).ok())
            .and_then(|(r, c)| Position::new(r, c))
            .ok_or_else(|| format!("position [{row}, {col}] is off the board"))
    }
}

impl From<Position> for [u8; 2] {
    fn from(pos: Position) -> Self {
        [pos.row, pos.col]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A point in drawing-surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    pub x: f32,
    pub y: f32,
}

impl Pixel {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Where the grid sits on the drawing surface.
///
/// Pieces stand on intersections, so a click resolves to the nearest
/// intersection rather than to the cell containing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    pub origin_x: f32,
    pub origin_y: f32,
    pub cell_size: f32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            origin_x: 50.0,
            origin_y: 50.0,
            cell_size: 60.0,
        }
    }
}

impl BoardGeometry {
    pub fn pixel_to_board(&self, x: f32, y: f32) -> Option<Position> {
        let col = nearest_line((x - self.origin_x) / self.cell_size)?;
        let row = nearest_line((y - self.origin_y) / self.cell_size)?;
        Position::new(row, col)
    }

    pub fn board_to_pixel(&self, pos: Position) -> Pixel {
        Pixel::new(
            self.origin_x + f32::from(pos.col) * self.cell_size,
            self.origin_y + f32::from(pos.row) * self.cell_size,
        )
    }

    /// Total drawable width, with the same margin on both sides of the grid.
    pub fn width(&self) -> f32 {
        2.0 * self.origin_x + f32::from(BOARD_COLS - 1) * self.cell_size
    }

    pub fn height(&self) -> f32 {
        2.0 * self.origin_y + f32::from(BOARD_ROWS - 1) * self.cell_size
    }
}

// Halves round up, so -0.5 still lands on line 0.
fn nearest_line(offset: f32) -> Option<u8> {
    let line = (offset + 0.5).floor();
    if line.is_finite() && (0.0..=f32::from(u8::MAX)).contains(&line) {
        Some(line as u8)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_round_trip_for_every_intersection() {
        let geometry = BoardGeometry::default();
        for pos in Position::all() {
            let px = geometry.board_to_pixel(pos);
            assert_eq!(geometry.pixel_to_board(px.x, px.y), Some(pos));
        }
        assert_eq!(Position::all().count(), 90);
    }

    #[test]
    fn click_resolves_to_nearest_intersection() {
        let geometry = BoardGeometry::default();
        // 29px right and 29px below (0, 0) is still closest to (0, 0)
        assert_eq!(geometry.pixel_to_board(79.0, 79.0), Position::new(0, 0));
        // 31px right crosses the midpoint towards column 1
        assert_eq!(geometry.pixel_to_board(81.0, 50.0), Position::new(0, 1));
        // slightly up and left of the origin still hits (0, 0)
        assert_eq!(geometry.pixel_to_board(30.0, 25.0), Position::new(0, 0));
    }

    #[test]
    fn off_board_clicks_resolve_to_nothing() {
        let geometry = BoardGeometry::default();
        assert_eq!(geometry.pixel_to_board(10.0, 50.0), None);
        assert_eq!(geometry.pixel_to_board(50.0, 10.0), None);
        // column 9 does not exist
        assert_eq!(geometry.pixel_to_board(50.0 + 9.0 * 60.0, 50.0), None);
        // row 10 does not exist
        assert_eq!(geometry.pixel_to_board(50.0, 50.0 + 10.0 * 60.0), None);
        assert_eq!(geometry.pixel_to_board(f32::NAN, 50.0), None);
    }

    #[test]
    fn drawable_extent_covers_grid_and_margins() {
        let geometry = BoardGeometry::default();
        assert_eq!(geometry.width(), 580.0);
        assert_eq!(geometry.height(), 640.0);
    }

    #[test]
    fn positions_travel_as_pairs() {
        let pos: Position = serde_json::from_str("[2, 7]").unwrap();
        assert_eq!(pos, Position::new(2, 7).unwrap());
        assert_eq!(serde_json::to_string(&pos).unwrap(), "[2,7]");
        assert!(serde_json::from_str::<Position>("[10, 0]").is_err());
        assert!(serde_json::from_str::<Position>("[-1, 3]").is_err());
    }
}
