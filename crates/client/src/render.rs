//! Draws the board onto an abstract 2D surface.
//!
//! The renderer keeps no state between calls: the same scene always produces
//! the same sequence of drawing operations.

use crate::constants::{BOARD_COLS, BOARD_ROWS, Color};
use crate::error::RenderError;
use crate::position::{BoardGeometry, Pixel, Position};
use crate::r#move::Move;
use crate::session::Session;
use crate::snapshot::BoardSnapshot;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

const BOARD_COLOR: Rgba = Rgba::rgb(245, 222, 179);
const LINE_COLOR: Rgba = Rgba::rgb(0, 0, 0);
const RIVER_COLOR: Rgba = Rgba::rgb(70, 130, 180);
const PIECE_FACE: Rgba = Rgba::rgb(240, 230, 208);
const RED_PIECE: Rgba = Rgba::rgb(192, 0, 0);
const BLACK_PIECE: Rgba = Rgba::rgb(0, 0, 0);
const SELECTED: Rgba = Rgba::rgba(255, 255, 0, 0.4);
const CANDIDATE: Rgba = Rgba::rgba(0, 255, 0, 0.4);
const LAST_MOVE: Rgba = Rgba::rgba(255, 165, 0, 0.25);

const LINE_WIDTH: f32 = 2.0;
const PIECE_BORDER: f32 = 3.0;

/// The drawing operations the board needs.
pub trait Surface {
    fn fill_rect(&mut self, top_left: Pixel, width: f32, height: f32, color: Rgba);
    fn fill_circle(&mut self, center: Pixel, radius: f32, color: Rgba);
    fn stroke_line(&mut self, from: Pixel, to: Pixel, width: f32, color: Rgba);
    /// Draws `text` centred on `center`.
    fn fill_text(&mut self, text: &str, center: Pixel, size: f32, color: Rgba);
}

/// Everything one frame shows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scene<'a> {
    pub snapshot: Option<&'a BoardSnapshot>,
    pub selected: Option<Position>,
    pub candidates: &'a [Position],
    pub last_move: Option<Move>,
}

impl<'a> From<&'a Session> for Scene<'a> {
    fn from(session: &'a Session) -> Self {
        Self {
            snapshot: session.snapshot(),
            selected: session.selected(),
            candidates: session.candidates(),
            last_move: session.last_move(),
        }
    }
}

fn piece_color(color: Color) -> Rgba {
    match color {
        Color::Red => RED_PIECE,
        Color::Black => BLACK_PIECE,
    }
}

pub struct BoardRenderer {
    geometry: BoardGeometry,
}

impl BoardRenderer {
    pub fn new(geometry: BoardGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    /// Draws `scene`. A snapshot holding an unknown piece kind is rejected
    /// before anything is drawn.
    pub fn render(&self, surface: &mut impl Surface, scene: &Scene<'_>) -> Result<(), RenderError> {
        let pieces = match scene.snapshot {
            Some(snapshot) => snapshot
                .pieces()
                .map(|(pos, piece)| {
                    piece
                        .glyph()
                        .map(|glyph| (pos, piece.color, glyph))
                        .ok_or(RenderError::UnknownPieceKind(pos))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        self.draw_grid(surface);
        self.draw_palaces(surface);
        self.draw_river(surface);
        for (pos, color, glyph) in pieces {
            self.draw_piece(surface, pos, color, glyph);
        }
        self.draw_highlights(surface, scene);
        Ok(())
    }

    fn point(&self, row: f32, col: f32) -> Pixel {
        let g = &self.geometry;
        Pixel::new(g.origin_x + col * g.cell_size, g.origin_y + row * g.cell_size)
    }

    fn line(&self, surface: &mut impl Surface, from: (f32, f32), to: (f32, f32)) {
        surface.stroke_line(
            self.point(from.0, from.1),
            self.point(to.0, to.1),
            LINE_WIDTH,
            LINE_COLOR,
        );
    }

    fn draw_grid(&self, surface: &mut impl Surface) {
        surface.fill_rect(
            Pixel::new(0.0, 0.0),
            self.geometry.width(),
            self.geometry.height(),
            BOARD_COLOR,
        );

        let last_row = f32::from(BOARD_ROWS - 1);
        let last_col = f32::from(BOARD_COLS - 1);

        // Vertical lines: the outer two run the full height, the inner ones
        // stop at the river.
        for col in 0..BOARD_COLS {
            let c = f32::from(col);
            if col == 0 || col == BOARD_COLS - 1 {
                self.line(surface, (0.0, c), (last_row, c));
            } else {
                self.line(surface, (0.0, c), (4.0, c));
                self.line(surface, (5.0, c), (last_row, c));
            }
        }

        for row in 0..BOARD_ROWS {
            let r = f32::from(row);
            self.line(surface, (r, 0.0), (r, last_col));
        }
    }

    fn draw_palaces(&self, surface: &mut impl Surface) {
        for top in [0.0, 7.0] {
            self.line(surface, (top, 3.0), (top + 2.0, 5.0));
            self.line(surface, (top, 5.0), (top + 2.0, 3.0));
        }
    }

    fn draw_river(&self, surface: &mut impl Surface) {
        let size = self.geometry.cell_size * 0.4;
        surface.fill_text("楚河", self.point(4.5, 2.0), size, RIVER_COLOR);
        surface.fill_text("漢界", self.point(4.5, 6.0), size, RIVER_COLOR);
    }

    fn draw_piece(&self, surface: &mut impl Surface, pos: Position, color: Color, glyph: char) {
        let center = self.geometry.board_to_pixel(pos);
        let radius = self.geometry.cell_size / 3.0;
        let ink = piece_color(color);

        // Border ring, then the face on top of it.
        surface.fill_circle(center, radius + PIECE_BORDER / 2.0, ink);
        surface.fill_circle(center, radius - PIECE_BORDER / 2.0, PIECE_FACE);

        let mut buf = [0u8; 4];
        surface.fill_text(
            glyph.encode_utf8(&mut buf),
            center,
            self.geometry.cell_size * 0.53,
            ink,
        );
    }

    fn draw_highlights(&self, surface: &mut impl Surface, scene: &Scene<'_>) {
        if let Some(mv) = scene.last_move {
            self.highlight(surface, mv.from, LAST_MOVE);
            self.highlight(surface, mv.to, LAST_MOVE);
        }
        if let Some(selected) = scene.selected {
            self.highlight(surface, selected, SELECTED);
            for &candidate in scene.candidates {
                self.highlight(surface, candidate, CANDIDATE);
            }
        }
    }

    /// A translucent cell-sized square centred on `pos`.
    fn highlight(&self, surface: &mut impl Surface, pos: Position, color: Rgba) {
        let center = self.geometry.board_to_pixel(pos);
        let cell = self.geometry.cell_size;
        surface.fill_rect(
            Pixel::new(center.x - cell / 2.0, center.y - cell / 2.0),
            cell,
            cell,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{Piece, PieceKind};
    use crate::test_support::{opening_snapshot, pos};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Rect(Pixel, f32, f32, Rgba),
        Circle(Pixel, f32, Rgba),
        Line(Pixel, Pixel),
        Text(String, Pixel),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Surface for Recorder {
        fn fill_rect(&mut self, top_left: Pixel, width: f32, height: f32, color: Rgba) {
            self.ops.push(Op::Rect(top_left, width, height, color));
        }

        fn fill_circle(&mut self, center: Pixel, radius: f32, color: Rgba) {
            self.ops.push(Op::Circle(center, radius, color));
        }

        fn stroke_line(&mut self, from: Pixel, to: Pixel, _width: f32, _color: Rgba) {
            self.ops.push(Op::Line(from, to));
        }

        fn fill_text(&mut self, text: &str, center: Pixel, _size: f32, _color: Rgba) {
            self.ops.push(Op::Text(text.to_string(), center));
        }
    }

    impl Recorder {
        fn lines(&self) -> Vec<(Pixel, Pixel)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Line(from, to) => Some((*from, *to)),
                    _ => None,
                })
                .collect()
        }

        fn texts(&self) -> Vec<String> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(text, _) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }

        fn highlights(&self) -> Vec<(Pixel, Rgba)> {
            self.ops
                .iter()
                .skip(1) // background
                .filter_map(|op| match op {
                    Op::Rect(top_left, _, _, color) => Some((*top_left, *color)),
                    _ => None,
                })
                .collect()
        }
    }

    fn draw(scene: &Scene<'_>) -> Recorder {
        let mut recorder = Recorder::default();
        BoardRenderer::new(BoardGeometry::default())
            .render(&mut recorder, scene)
            .unwrap();
        recorder
    }

    #[test]
    fn empty_board_has_grid_palaces_and_river() {
        let recorder = draw(&Scene::default());
        // 2 edge columns, 7 split columns, 10 rows, 4 palace diagonals
        assert_eq!(recorder.lines().len(), 2 + 7 * 2 + 10 + 4);
        assert_eq!(recorder.texts(), vec!["楚河", "漢界"]);
        assert_eq!(
            recorder.ops[0],
            Op::Rect(Pixel::new(0.0, 0.0), 580.0, 640.0, BOARD_COLOR)
        );
    }

    #[test]
    fn inner_columns_break_at_the_river() {
        let recorder = draw(&Scene::default());
        let river_y = 50.0 + 4.5 * 60.0;
        let crossing: Vec<f32> = recorder
            .lines()
            .into_iter()
            .filter(|(from, to)| from.x == to.x)
            .filter(|(from, to)| from.y.min(to.y) < river_y && from.y.max(to.y) > river_y)
            .map(|(from, _)| from.x)
            .collect();
        assert_eq!(crossing, vec![50.0, 50.0 + 8.0 * 60.0]);
    }

    #[test]
    fn pieces_are_drawn_with_their_glyphs() {
        let snapshot = opening_snapshot();
        let recorder = draw(&Scene {
            snapshot: Some(&snapshot),
            ..Scene::default()
        });
        let texts = recorder.texts();
        for glyph in ["車", "將", "俥", "帥"] {
            assert!(texts.iter().any(|t| t == glyph), "missing {glyph}");
        }
        let general = Op::Text("帥".to_string(), Pixel::new(290.0, 590.0));
        assert!(recorder.ops.contains(&general));
    }

    #[test]
    fn piece_ink_follows_side() {
        assert_eq!(piece_color(Color::Red), RED_PIECE);
        assert_eq!(piece_color(Color::Black), BLACK_PIECE);
        assert_ne!(piece_color(Color::Red), piece_color(Color::Black));
    }

    #[test]
    fn selection_and_candidates_are_highlighted_last() {
        let snapshot = opening_snapshot();
        let candidates = [pos(8, 0), pos(7, 0)];
        let recorder = draw(&Scene {
            snapshot: Some(&snapshot),
            selected: Some(pos(9, 0)),
            candidates: &candidates,
            last_move: None,
        });

        assert_eq!(
            recorder.highlights(),
            vec![
                (Pixel::new(20.0, 560.0), SELECTED),
                (Pixel::new(20.0, 500.0), CANDIDATE),
                (Pixel::new(20.0, 440.0), CANDIDATE),
            ]
        );
        assert!(matches!(recorder.ops.last(), Some(Op::Rect(..))));
    }

    #[test]
    fn last_move_sits_under_selection() {
        let scene = Scene {
            selected: Some(pos(9, 4)),
            last_move: Some(Move::new(pos(0, 0), pos(1, 0))),
            ..Scene::default()
        };
        let colors: Vec<Rgba> = draw(&scene).highlights().into_iter().map(|(_, c)| c).collect();
        assert_eq!(colors, vec![LAST_MOVE, LAST_MOVE, SELECTED]);
    }

    #[test]
    fn drawing_twice_is_identical() {
        let snapshot = opening_snapshot();
        let candidates = [pos(8, 0)];
        let scene = Scene {
            snapshot: Some(&snapshot),
            selected: Some(pos(9, 0)),
            candidates: &candidates,
            last_move: Some(Move::new(pos(0, 4), pos(1, 4))),
        };
        assert_eq!(draw(&scene).ops, draw(&scene).ops);
    }

    #[test]
    fn unknown_piece_kind_fails_the_draw() {
        let snapshot = opening_snapshot()
            .with_piece(pos(5, 5), Piece::new(Color::Red, PieceKind::Unknown));
        let mut recorder = Recorder::default();
        let result = BoardRenderer::new(BoardGeometry::default()).render(
            &mut recorder,
            &Scene {
                snapshot: Some(&snapshot),
                ..Scene::default()
            },
        );
        assert_eq!(result, Err(RenderError::UnknownPieceKind(pos(5, 5))));
        assert!(recorder.ops.is_empty());
    }
}
