//! Geometry primitives shared by the renderer and its canvases
//!
//! Coordinates grow right and down. Units are whatever the canvas measures
//! text in.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Shrink by `dx` on the left and right and `dy` on the top and bottom
    pub fn inset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: (self.width - 2.0 * dx).max(0.0),
            height: (self.height - 2.0 * dy).max(0.0),
        }
    }
}

/// Direction of travel where a curve starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Horizontal,
    Vertical,
}

/// A quarter-turn join between two rails
///
/// The curve leaves `from` along `heading` and arrives at `to` along the
/// other axis, turning around [`Curve::corner`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    pub from: Point,
    pub to: Point,
    pub heading: Heading,
}

impl Curve {
    pub fn new(from: Point, to: Point, heading: Heading) -> Self {
        Self { from, to, heading }
    }

    /// Where the two straight legs of the curve would meet
    pub fn corner(&self) -> Point {
        match self.heading {
            Heading::Horizontal => Point::new(self.to.x, self.from.y),
            Heading::Vertical => Point::new(self.from.x, self.to.y),
        }
    }
}
