//! Static 10x20 board with one piece held above the stack.
//!
//! Only a fixed scene for exercising the renderer; there are no game rules here.

use tetris_engine::coords::{Color, Rect};
use tetris_engine::render::{GpuBackend, Renderer};

pub const COLUMNS: usize = 10;
pub const ROWS: usize = 20;

const CELL: f32 = 22.0;
const GAP: f32 = 1.0;
const BORDER: f32 = 4.0;
const ORIGIN_X: f32 = (720.0 - COLUMNS as f32 * CELL) / 2.0;
const ORIGIN_Y: f32 = (480.0 - ROWS as f32 * CELL) / 2.0;

const FRAME: Color = Color::new(0.55, 0.55, 0.6);
const WELL: Color = Color::new(0.08, 0.08, 0.1);

const PALETTE: [Color; 7] = [
    Color::new(0.0, 0.9, 0.9),
    Color::new(0.95, 0.85, 0.0),
    Color::new(0.65, 0.0, 0.9),
    Color::new(0.0, 0.85, 0.2),
    Color::new(0.9, 0.1, 0.1),
    Color::new(0.1, 0.3, 0.95),
    Color::new(0.95, 0.55, 0.0),
];

/// Cell offsets (column, row) of the "T" piece.
const PIECE: [(usize, usize); 4] = [(0, 0), (1, 0), (2, 0), (1, 1)];
const PIECE_COLUMN: usize = 3;
const PIECE_ROW: usize = 6;

pub struct Playfield {
    cells: [[Option<Color>; COLUMNS]; ROWS],
}

impl Default for Playfield {
    fn default() -> Self {
        let mut cells = [[None; COLUMNS]; ROWS];
        // Ragged stack along the floor with the piece columns left open.
        for (row, line) in cells.iter_mut().enumerate().skip(ROWS - 4) {
            for (col, cell) in line.iter_mut().enumerate() {
                if (col + row) % 4 != 0 && !(PIECE_COLUMN..PIECE_COLUMN + 3).contains(&col) {
                    *cell = Some(PALETTE[(col + row) % PALETTE.len()]);
                }
            }
        }
        Self { cells }
    }
}

impl Playfield {
    pub fn quad_count(&self) -> usize {
        let well = 1 + 4;
        let stack = self.cells.iter().flatten().filter(|c| c.is_some()).count();
        well + stack + PIECE.len()
    }

    pub fn draw<B: GpuBackend>(&self, renderer: &mut Renderer<B>) {
        let width = COLUMNS as f32 * CELL;
        let height = ROWS as f32 * CELL;

        // Frame as four bars around the well.
        renderer.draw_quad(ORIGIN_X - BORDER, ORIGIN_Y - BORDER, width + 2.0 * BORDER, BORDER, FRAME);
        renderer.draw_quad(ORIGIN_X - BORDER, ORIGIN_Y + height, width + 2.0 * BORDER, BORDER, FRAME);
        renderer.draw_quad(ORIGIN_X - BORDER, ORIGIN_Y, BORDER, height, FRAME);
        renderer.draw_quad(ORIGIN_X + width, ORIGIN_Y, BORDER, height, FRAME);
        renderer.draw_quad(ORIGIN_X, ORIGIN_Y, width, height, WELL);

        for (row, line) in self.cells.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                if let Some(color) = cell {
                    renderer.draw_rect(cell_rect(col, row), *color);
                }
            }
        }

        for &(dc, dr) in &PIECE {
            renderer.draw_rect(cell_rect(PIECE_COLUMN + dc, PIECE_ROW + dr), PALETTE[2]);
        }
    }
}

fn cell_rect(col: usize, row: usize) -> Rect {
    Rect::new(
        ORIGIN_X + col as f32 * CELL + GAP,
        ORIGIN_Y + row as f32 * CELL + GAP,
        CELL - 2.0 * GAP,
        CELL - 2.0 * GAP,
    )
}
