//! Railyard - Turn formal grammars into railroad syntax diagrams
//!
//! A grammar is a set of named productions whose right-hand sides are
//! [`Term`](grammar::Term) trees. The diagram builder rewrites each requested
//! production into a minimal [`Figure`](diagram::Figure) tree, and a
//! [`ShapeRenderer`](render::ShapeRenderer) lays that tree out and draws it
//! on any [`CanvasProvider`](render::CanvasProvider).
//!
//! # Quick Start
//!
//! ```rust
//! use railyard::grammar::{GrammarBuilder, Term};
//!
//! let grammar = GrammarBuilder::new("demo")
//!     .production("list", Term::sequence([
//!         Term::non_terminal("item"),
//!         Term::zero_or_more(Term::sequence([Term::literal(","), Term::non_terminal("item")])),
//!     ]))
//!     .production("item", Term::literal("x"))
//!     .build()
//!     .unwrap();
//!
//! let svg = railyard::render_svg(&grammar, &["list"]).unwrap();
//! assert!(svg[0].contains("<svg"));
//! ```
//!
//! # Advanced Usage
//!
//! ```rust
//! use railyard::prelude::*;
//!
//! let grammar = GrammarBuilder::new("demo")
//!     .production("keyword", Term::literal_any_case("select"))
//!     .build()
//!     .unwrap();
//!
//! let options = BuilderOptions::new().expand_any_case(true);
//! let diagrams = build(&grammar, ["keyword"], options).unwrap();
//!
//! let mut renderer = ShapeRenderer::new(RenderOptions::grid());
//! let mut canvas = AsciiCanvas::new(GlyphStyle::Ascii);
//! let text = diagrams[0].convert(&mut renderer, &mut canvas).unwrap();
//! assert!(text.contains("keyword"));
//! ```

pub mod charset;
pub mod core;
pub mod diagram;
pub mod grammar;
pub mod plugins;
pub mod render;

pub use crate::core::{RailyardError, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::charset::{CharClass, CodePointSet};
    pub use crate::core::{BuilderOptions, Overrides, RailyardError, RenderOptions};
    pub use crate::diagram::{build, Diagram, DiagramBuilder, Figure};
    pub use crate::grammar::{Grammar, GrammarBuilder, Term};
    pub use crate::plugins::{AsciiCanvas, GlyphStyle, SvgCanvas};
    pub use crate::render::{CanvasProvider, ShapeRenderer};
}

use crate::core::{BuilderOptions, RenderOptions};
use crate::grammar::Grammar;
use crate::plugins::{AsciiCanvas, GlyphStyle, SvgCanvas};
use crate::render::ShapeRenderer;

/// Render the named productions as SVG documents with default options
///
/// # Example
/// ```rust
/// use railyard::grammar::{GrammarBuilder, Term};
///
/// let grammar = GrammarBuilder::new("demo")
///     .production("digit", Term::characters_of_set("[0-9]").unwrap())
///     .build()
///     .unwrap();
/// let svg = railyard::render_svg(&grammar, &["digit"]).unwrap();
/// assert!(svg[0].contains("[0-9]"));
/// ```
pub fn render_svg(grammar: &Grammar, roots: &[&str]) -> anyhow::Result<Vec<String>> {
    let diagrams = diagram::build(grammar, roots, BuilderOptions::default())?;
    let mut renderer = ShapeRenderer::new(RenderOptions::default());
    let mut canvas = SvgCanvas::new();
    diagrams
        .iter()
        .map(|d| Ok(d.convert(&mut renderer, &mut canvas)?))
        .collect()
}

/// Render the named productions as text pictures with default grid options
///
/// # Example
/// ```rust
/// use railyard::grammar::{GrammarBuilder, Term};
/// use railyard::plugins::GlyphStyle;
///
/// let grammar = GrammarBuilder::new("demo")
///     .production("greeting", Term::literal("hello"))
///     .build()
///     .unwrap();
/// let text = railyard::render_ascii(&grammar, &["greeting"], GlyphStyle::Unicode).unwrap();
/// assert!(text[0].contains("hello"));
/// ```
pub fn render_ascii(
    grammar: &Grammar,
    roots: &[&str],
    style: GlyphStyle,
) -> anyhow::Result<Vec<String>> {
    let diagrams = diagram::build(grammar, roots, BuilderOptions::default())?;
    let mut renderer = ShapeRenderer::new(RenderOptions::grid());
    let mut canvas = AsciiCanvas::new(style);
    diagrams
        .iter()
        .map(|d| Ok(d.convert(&mut renderer, &mut canvas)?))
        .collect()
}
