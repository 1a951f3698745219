//! Shape renderer contract
//!
//! [`ShapeRenderer`] owns all layout. It walks a [`Figure`] once to measure
//! it, then once more to issue drawing primitives against a
//! [`CanvasProvider`]. Canvases only measure text and paint what they are
//! told; they never decide where anything goes, so the same figure produces
//! the same geometry on every backend that measures text the same way.

mod geometry;
mod layout;

pub use geometry::*;

use tracing::{debug, info_span};

use crate::core::RenderOptions;
use crate::diagram::{Diagram, Figure};
use layout::Measured;

/// How a piece of text is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    /// Literal text
    Terminal,
    /// Case-insensitive literal
    AnyCase,
    /// Production reference
    NonTerminal,
    /// Character class
    CharSet,
    /// Repetition counts under a loop
    Annotation,
    /// Diagram title
    Title,
}

/// Outline drawn around a leaf figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxShape {
    /// Literal text
    Rounded,
    /// Case-insensitive literal
    Dotted,
    /// Character class
    Angled,
    /// Reference to a production
    Square,
    /// Reference to a production that repeats
    Double,
}

/// Drawing backend driven by [`ShapeRenderer`]
///
/// Every primitive may fail with the backend's own error type, which the
/// renderer hands back to the caller unchanged.
pub trait CanvasProvider {
    /// What a finished drawing produces
    type Output;
    type Error;

    /// Get the name of this canvas
    fn name(&self) -> &'static str;

    /// Get the output format this canvas produces
    fn format(&self) -> &'static str;

    /// Extent of `text` set in `style`
    fn measure_text(&mut self, text: &str, style: TextStyle) -> Result<Size, Self::Error>;

    /// Start a drawing of the given overall size, discarding any previous one
    fn begin(&mut self, size: Size) -> Result<(), Self::Error>;

    /// Straight rail between two points sharing an axis
    fn draw_connector(&mut self, from: Point, to: Point) -> Result<(), Self::Error>;

    fn draw_curve(&mut self, curve: Curve) -> Result<(), Self::Error>;

    fn draw_box(&mut self, bounds: Rect, shape: BoxShape) -> Result<(), Self::Error>;

    /// Set `text` inside `bounds`, which is exactly the measured extent
    fn draw_text(&mut self, bounds: Rect, text: &str, style: TextStyle) -> Result<(), Self::Error>;

    /// Complete the drawing started by [`CanvasProvider::begin`]
    fn finish(&mut self) -> Result<Self::Output, Self::Error>;
}

/// Lays out figures and draws them on a canvas
///
/// A renderer keeps the size of its most recent drawing, so give each
/// thread its own instance.
#[derive(Debug, Clone, Default)]
pub struct ShapeRenderer {
    options: RenderOptions,
    last_size: Option<Size>,
}

impl ShapeRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            last_size: None,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Overall size of the most recent drawing
    pub fn last_size(&self) -> Option<Size> {
        self.last_size
    }

    /// Draw a bare figure between lead-in and lead-out rails
    pub fn render<C: CanvasProvider>(
        &mut self,
        figure: &Figure,
        canvas: &mut C,
    ) -> Result<C::Output, C::Error> {
        self.render_titled(None, figure, canvas)
    }

    /// Draw a diagram, titled with its production name when
    /// [`RenderOptions::show_title`] is set
    pub fn render_diagram<C: CanvasProvider>(
        &mut self,
        diagram: &Diagram,
        canvas: &mut C,
    ) -> Result<C::Output, C::Error> {
        let title = self.options.show_title.then(|| diagram.name());
        self.render_titled(title, diagram.figure(), canvas)
    }

    fn render_titled<C: CanvasProvider>(
        &mut self,
        title: Option<&str>,
        figure: &Figure,
        canvas: &mut C,
    ) -> Result<C::Output, C::Error> {
        let _span = info_span!("render", canvas = canvas.name(), title).entered();
        let o = self.options;

        let title = match title {
            Some(text) => Some((text, canvas.measure_text(text, TextStyle::Title)?)),
            None => None,
        };
        let measured = Measured::measure(figure, canvas, &o)?;
        debug!(
            width = measured.size.width,
            height = measured.size.height,
            "Measured figure"
        );

        let top = match title {
            Some((_, size)) => o.margin + size.height + o.vertical_gap,
            None => o.margin,
        };
        let figure_width = measured.size.width + 2.0 * o.terminal_length;
        let title_width = title.map_or(0.0, |(_, size)| size.width);
        let size = Size::new(
            figure_width.max(title_width) + 2.0 * o.margin,
            top + measured.size.height + o.margin,
        );
        self.last_size = Some(size);

        canvas.begin(size)?;
        if let Some((text, text_size)) = title {
            canvas.draw_text(
                Rect::new(Point::new(o.margin, o.margin), text_size),
                text,
                TextStyle::Title,
            )?;
        }

        let rail = top + measured.rail;
        let origin = Point::new(o.margin + o.terminal_length, top);
        layout::connect(canvas, Point::new(o.margin, rail), Point::new(origin.x, rail))?;
        measured.draw(figure, origin, canvas, &o)?;
        let exit = origin.x + measured.size.width;
        layout::connect(
            canvas,
            Point::new(exit, rail),
            Point::new(exit + o.terminal_length, rail),
        )?;
        canvas.finish()
    }
}

/// Box outline and text style for a leaf figure
pub(crate) fn leaf_style(figure: &Figure) -> Option<(BoxShape, TextStyle)> {
    match figure {
        Figure::Text { .. } => Some((BoxShape::Rounded, TextStyle::Terminal)),
        Figure::AnyCase { .. } => Some((BoxShape::Dotted, TextStyle::AnyCase)),
        Figure::Characters { .. } => Some((BoxShape::Angled, TextStyle::CharSet)),
        Figure::Reference { plural: false, .. } => Some((BoxShape::Square, TextStyle::NonTerminal)),
        Figure::Reference { plural: true, .. } => Some((BoxShape::Double, TextStyle::NonTerminal)),
        Figure::Branch { .. } | Figure::Line { .. } | Figure::Loop { .. } | Figure::Nothing => None,
    }
}
