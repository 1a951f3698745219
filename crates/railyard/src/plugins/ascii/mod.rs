//! Grid backend
//!
//! Draws on a character grid and yields the finished picture as a string.
//! One cell is one unit, so pair it with [`RenderOptions::grid`](crate::core::RenderOptions::grid).

mod canvas;
mod glyphs;

pub use glyphs::{BoxGlyphs, GlyphStyle};

use std::convert::Infallible;

use tracing::trace;

use crate::core::display_width;
use crate::render::{BoxShape, CanvasProvider, Curve, Point, Rect, Size, TextStyle};
use canvas::Grid;

/// Live-paint canvas over a character grid
#[derive(Debug, Clone)]
pub struct AsciiCanvas {
    grid: Grid,
}

impl AsciiCanvas {
    pub fn new(style: GlyphStyle) -> Self {
        Self {
            grid: Grid::new(0, 0, style),
        }
    }

    pub fn style(&self) -> GlyphStyle {
        self.grid.style
    }
}

impl Default for AsciiCanvas {
    fn default() -> Self {
        Self::new(GlyphStyle::default())
    }
}

fn cell(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value.floor() as usize
    } else {
        0
    }
}

impl CanvasProvider for AsciiCanvas {
    type Output = String;
    type Error = Infallible;

    fn name(&self) -> &'static str {
        "ascii"
    }

    fn format(&self) -> &'static str {
        "text"
    }

    fn measure_text(&mut self, text: &str, _style: TextStyle) -> Result<Size, Infallible> {
        Ok(Size::new(display_width(text) as f64, 1.0))
    }

    fn begin(&mut self, size: Size) -> Result<(), Infallible> {
        trace!(width = size.width, height = size.height, "Starting grid");
        self.grid
            .reset(size.width.ceil() as usize, size.height.ceil() as usize);
        Ok(())
    }

    fn draw_connector(&mut self, from: Point, to: Point) -> Result<(), Infallible> {
        let (x0, y0, x1, y1) = (cell(from.x), cell(from.y), cell(to.x), cell(to.y));
        // Off-axis connectors run horizontally first
        self.grid.horizontal_rail(y0, x0, x1);
        self.grid.vertical_rail(x1, y0, y1);
        Ok(())
    }

    fn draw_curve(&mut self, curve: Curve) -> Result<(), Infallible> {
        let corner = curve.corner();
        self.draw_connector(curve.from, corner)?;
        self.draw_connector(corner, curve.to)
    }

    fn draw_box(&mut self, bounds: Rect, shape: BoxShape) -> Result<(), Infallible> {
        let x1 = cell(bounds.right()).saturating_sub(1);
        let y1 = cell(bounds.bottom()).saturating_sub(1);
        self.grid
            .draw_box(cell(bounds.x), cell(bounds.y), x1, y1, shape);
        Ok(())
    }

    fn draw_text(&mut self, bounds: Rect, text: &str, _style: TextStyle) -> Result<(), Infallible> {
        self.grid.draw_text(cell(bounds.x), cell(bounds.y), text);
        Ok(())
    }

    fn finish(&mut self) -> Result<String, Infallible> {
        Ok(self.grid.to_string())
    }
}
