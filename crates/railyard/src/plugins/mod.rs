//! Drawing backends
//!
//! Each backend implements [`CanvasProvider`](crate::render::CanvasProvider)
//! for one output technology.

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;
