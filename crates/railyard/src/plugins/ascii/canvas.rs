//! Character grid that rails are painted into
//!
//! Rails are recorded per cell as a set of directions and only turned into
//! characters when the grid is printed, so crossing and touching rails come
//! out as the right junction glyph. Box outlines and text overwrite rails.

use std::fmt;

use unicode_width::UnicodeWidthChar;

use super::glyphs::{rail_glyph, BoxGlyphs, GlyphStyle, EAST, NORTH, SOUTH, WEST};
use crate::render::BoxShape;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Cell {
    #[default]
    Empty,
    Rail(u8),
    Glyph(char),
    /// Right half of a double-width glyph
    Continuation,
}

#[derive(Debug, Clone)]
pub(crate) struct Grid {
    pub style: GlyphStyle,
    pub width: usize,
    pub height: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(width: usize, height: usize, style: GlyphStyle) -> Self {
        Self {
            style,
            width,
            height,
            cells: vec![vec![Cell::Empty; width.max(1)]; height.max(1)],
        }
    }

    /// Ensure the grid is at least the given size, expanding if needed
    pub fn ensure_size(&mut self, min_width: usize, min_height: usize) {
        if min_width > self.width {
            for row in &mut self.cells {
                row.resize(min_width, Cell::Empty);
            }
            self.width = min_width;
        }
        if min_height > self.height {
            let extra_rows = min_height - self.height;
            self.cells
                .extend((0..extra_rows).map(|_| vec![Cell::Empty; self.width]));
            self.height = min_height;
        }
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or_default()
    }

    pub fn get_char(&self, x: usize, y: usize) -> char {
        match self.cell(x, y) {
            Cell::Empty | Cell::Continuation => ' ',
            Cell::Rail(bits) => rail_glyph(bits, self.style),
            Cell::Glyph(c) => c,
        }
    }

    pub fn set_char(&mut self, x: usize, y: usize, c: char) {
        self.ensure_size(x + 1, y + 1);
        self.cells[y][x] = Cell::Glyph(c);
    }

    /// Add rail directions to a cell; glyph cells are left alone
    ///
    /// Rails are clipped to the grid. A rail ending on the right or bottom
    /// edge of the drawing leaves it there.
    fn mark(&mut self, x: usize, y: usize, bits: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let cell = &mut self.cells[y][x];
        *cell = match *cell {
            Cell::Empty => Cell::Rail(bits),
            Cell::Rail(existing) => Cell::Rail(existing | bits),
            glyph @ (Cell::Glyph(_) | Cell::Continuation) => glyph,
        };
    }

    /// Rail between two cells in the same row
    pub fn horizontal_rail(&mut self, y: usize, x0: usize, x1: usize) {
        let (from, to) = (x0.min(x1), x0.max(x1));
        if from == to {
            return;
        }
        self.mark(from, y, EAST);
        for x in from + 1..to {
            self.mark(x, y, EAST | WEST);
        }
        self.mark(to, y, WEST);
    }

    /// Rail between two cells in the same column
    pub fn vertical_rail(&mut self, x: usize, y0: usize, y1: usize) {
        let (from, to) = (y0.min(y1), y0.max(y1));
        if from == to {
            return;
        }
        self.mark(x, from, SOUTH);
        for y in from + 1..to {
            self.mark(x, y, NORTH | SOUTH);
        }
        self.mark(x, to, NORTH);
    }

    /// Draw text left-aligned at the given cell, giving wide glyphs two cells
    pub fn draw_text(&mut self, x: usize, y: usize, text: &str) {
        let mut column = x;
        for c in text.chars() {
            let width = c.width().unwrap_or(0);
            if width == 0 {
                continue;
            }
            self.set_char(column, y, c);
            for extra in 1..width {
                self.ensure_size(column + extra + 1, y + 1);
                self.cells[y][column + extra] = Cell::Continuation;
            }
            column += width;
        }
    }

    /// Outline the cells from `(x0, y0)` to `(x1, y1)` inclusive and blank
    /// the interior
    pub fn draw_box(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, shape: BoxShape) {
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let g = BoxGlyphs::for_shape(shape, self.style);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let c = match (x, y) {
                    (x, y) if x == x0 && y == y0 => g.top_left,
                    (x, y) if x == x1 && y == y0 => g.top_right,
                    (x, y) if x == x0 && y == y1 => g.bottom_left,
                    (x, y) if x == x1 && y == y1 => g.bottom_right,
                    (_, y) if y == y0 || y == y1 => g.horizontal,
                    (x, _) if x == x0 => g.left,
                    (x, _) if x == x1 => g.right,
                    _ => ' ',
                };
                self.set_char(x, y, c);
            }
        }
    }

    /// Forget everything drawn and resize
    pub fn reset(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height, self.style);
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rows: Vec<String> = (0..self.height)
            .map(|y| {
                let row: String = (0..self.width)
                    .filter(|&x| self.cell(x, y) != Cell::Continuation)
                    .map(|x| self.get_char(x, y))
                    .collect();
                row.trim_end().to_string()
            })
            .collect();

        // Trim empty rows from top and bottom
        while rows.first().is_some_and(|row| row.is_empty()) {
            rows.remove(0);
        }
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }

        write!(f, "{}", rows.join("\n"))
    }
}
