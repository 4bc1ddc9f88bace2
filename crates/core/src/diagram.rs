//! SVG board diagrams
//!
//! Renders a position from White's side with the last move highlighted and
//! an optional arrow for the engine's suggested reply, then writes it to the
//! output directory as `trekk_<NN>_<san>.svg`.

use std::fs;
use std::path::{Path, PathBuf};

use askama::Template;
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, Color, EnPassantMode, Position, Role, Square};

use crate::error::Result;

const SQUARE_SIZE: u32 = 45;
const MARGIN: u32 = 20;
const BOARD_SIZE: u32 = 2 * MARGIN + 8 * SQUARE_SIZE;

const LIGHT: &str = "#ffce9e";
const DARK: &str = "#d18b47";
const LIGHT_LASTMOVE: &str = "#cdd16a";
const DARK_LASTMOVE: &str = "#aaa23b";

/// Colour of the best-reply arrow
pub const ARROW_COLOR: &str = "#00ff00";

const ARROW_WIDTH: f32 = 9.0;
const ARROW_HEAD_LENGTH: f32 = 20.0;
const ARROW_HEAD_WIDTH: f32 = 22.0;

pub struct SquareView {
    pub x: u32,
    pub y: u32,
    pub fill: &'static str,
    pub class: &'static str,
}

pub struct CoordView {
    pub x: u32,
    pub y: u32,
    pub label: char,
}

pub struct PieceView {
    pub x: u32,
    pub y: u32,
    pub glyph: char,
    pub class: &'static str,
}

pub struct ArrowView {
    pub x1: String,
    pub y1: String,
    pub x2: String,
    pub y2: String,
    pub head: String,
    pub width: f32,
    pub color: &'static str,
}

#[derive(Template)]
#[template(path = "board.svg", escape = "none")]
pub struct BoardDiagram {
    pub size: u32,
    pub square_size: u32,
    pub glyph_size: u32,
    pub fen: String,
    pub squares: Vec<SquareView>,
    pub coords: Vec<CoordView>,
    pub pieces: Vec<PieceView>,
    pub arrows: Vec<ArrowView>,
}

impl BoardDiagram {
    pub fn new(position: &Chess, last_move: &UciMove, best_reply: Option<&UciMove>) -> Self {
        let highlighted = move_squares(last_move);

        let squares = Square::ALL
            .iter()
            .map(|&sq| {
                let (x, y) = square_origin(sq);
                let light = is_light(sq);
                let lastmove = highlighted.contains(&sq);
                let fill = match (light, lastmove) {
                    (true, false) => LIGHT,
                    (false, false) => DARK,
                    (true, true) => LIGHT_LASTMOVE,
                    (false, true) => DARK_LASTMOVE,
                };
                let class = match (light, lastmove) {
                    (true, false) => "square light",
                    (false, false) => "square dark",
                    (true, true) => "square light lastmove",
                    (false, true) => "square dark lastmove",
                };
                SquareView { x, y, fill, class }
            })
            .collect();

        let pieces = Square::ALL
            .iter()
            .filter_map(|&sq| {
                let piece = position.board().piece_at(sq)?;
                let (x, y) = square_origin(sq);
                Some(PieceView {
                    x: x + SQUARE_SIZE / 2,
                    y: y + SQUARE_SIZE / 2,
                    glyph: piece_glyph(piece.role),
                    class: if piece.color == Color::White { "white" } else { "black" },
                })
            })
            .collect();

        let arrows = best_reply.and_then(arrow_for).into_iter().collect();

        Self {
            size: BOARD_SIZE,
            square_size: SQUARE_SIZE,
            glyph_size: SQUARE_SIZE * 4 / 5,
            fen: Fen::from_position(position, EnPassantMode::Legal).to_string(),
            squares,
            coords: coordinates(),
            pieces,
            arrows,
        }
    }
}

/// Renders one position straight to SVG text
pub fn render_svg(position: &Chess, last_move: &UciMove, best_reply: Option<&UciMove>) -> Result<String> {
    Ok(BoardDiagram::new(position, last_move, best_reply).render()?)
}

/// `trekk_01_e4.svg` style name for the move at `index` (1-based)
pub fn diagram_file_name(index: usize, san: &str) -> String {
    format!("trekk_{:02}_{}.svg", index, san)
}

/// Writes a rendered diagram into `dir`, which must already exist. An
/// existing file of the same name is replaced.
pub fn write_diagram(dir: &Path, index: usize, san: &str, svg: &str) -> Result<PathBuf> {
    let path = dir.join(diagram_file_name(index, san));
    fs::write(&path, svg)?;
    Ok(path)
}

fn file_rank(sq: Square) -> (u32, u32) {
    (u32::from(sq.file()), u32::from(sq.rank()))
}

fn is_light(sq: Square) -> bool {
    let (file, rank) = file_rank(sq);
    (file + rank) % 2 == 1
}

/// Top-left corner of a square, White at the bottom
fn square_origin(sq: Square) -> (u32, u32) {
    let (file, rank) = file_rank(sq);
    (MARGIN + file * SQUARE_SIZE, MARGIN + (7 - rank) * SQUARE_SIZE)
}

fn square_center(sq: Square) -> (f32, f32) {
    let (x, y) = square_origin(sq);
    let half = SQUARE_SIZE as f32 / 2.0;
    (x as f32 + half, y as f32 + half)
}

fn move_squares(mv: &UciMove) -> Vec<Square> {
    match mv {
        UciMove::Normal { from, to, .. } => vec![*from, *to],
        UciMove::Put { to, .. } => vec![*to],
        _ => Vec::new(),
    }
}

fn arrow_for(mv: &UciMove) -> Option<ArrowView> {
    let UciMove::Normal { from, to, .. } = mv else {
        return None;
    };
    if from == to {
        return None;
    }

    let (x1, y1) = square_center(*from);
    let (tip_x, tip_y) = square_center(*to);
    let (dx, dy) = (tip_x - x1, tip_y - y1);
    let length = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = (dx / length, dy / length);

    // The shaft stops where the head begins
    let x2 = tip_x - ux * ARROW_HEAD_LENGTH;
    let y2 = tip_y - uy * ARROW_HEAD_LENGTH;
    let (px, py) = (-uy * ARROW_HEAD_WIDTH / 2.0, ux * ARROW_HEAD_WIDTH / 2.0);

    Some(ArrowView {
        x1: format!("{:.1}", x1),
        y1: format!("{:.1}", y1),
        x2: format!("{:.1}", x2),
        y2: format!("{:.1}", y2),
        head: format!(
            "{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
            tip_x,
            tip_y,
            x2 + px,
            y2 + py,
            x2 - px,
            y2 - py
        ),
        width: ARROW_WIDTH,
        color: ARROW_COLOR,
    })
}

fn coordinates() -> Vec<CoordView> {
    let mut coords = Vec::with_capacity(16);
    for (i, label) in "abcdefgh".chars().enumerate() {
        coords.push(CoordView {
            x: MARGIN + i as u32 * SQUARE_SIZE + SQUARE_SIZE / 2,
            y: BOARD_SIZE - MARGIN / 2,
            label,
        });
    }
    for (i, label) in "87654321".chars().enumerate() {
        coords.push(CoordView {
            x: MARGIN / 2,
            y: MARGIN + i as u32 * SQUARE_SIZE + SQUARE_SIZE / 2,
            label,
        });
    }
    coords
}

fn piece_glyph(role: Role) -> char {
    match role {
        Role::King => '\u{265A}',
        Role::Queen => '\u{265B}',
        Role::Rook => '\u{265C}',
        Role::Bishop => '\u{265D}',
        Role::Knight => '\u{265E}',
        Role::Pawn => '\u{265F}',
    }
}
