//! Glyph tables for grid rendering
//!
//! Both ASCII and Unicode sets are provided; ASCII output survives any
//! terminal or file encoding.

use std::fmt;
use std::str::FromStr;

use crate::render::BoxShape;

/// Which characters the grid canvas draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphStyle {
    /// Plain 7-bit ASCII
    Ascii,
    /// Unicode box-drawing characters
    #[default]
    Unicode,
}

impl GlyphStyle {
    pub fn variants() -> &'static [&'static str] {
        &["ascii", "unicode"]
    }
}

impl FromStr for GlyphStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ascii" => Ok(Self::Ascii),
            "unicode" => Ok(Self::Unicode),
            _ => Err(format!(
                "Unknown glyph style: {}. Valid options: {}",
                s,
                Self::variants().join(", ")
            )),
        }
    }
}

impl fmt::Display for GlyphStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascii => write!(f, "ascii"),
            Self::Unicode => write!(f, "unicode"),
        }
    }
}

/// Outline characters for one box shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxGlyphs {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub left: char,
    pub right: char,
}

impl BoxGlyphs {
    const fn uniform(corners: [char; 4], horizontal: char, vertical: char) -> Self {
        Self {
            top_left: corners[0],
            top_right: corners[1],
            bottom_left: corners[2],
            bottom_right: corners[3],
            horizontal,
            left: vertical,
            right: vertical,
        }
    }

    pub fn for_shape(shape: BoxShape, style: GlyphStyle) -> Self {
        match (style, shape) {
            (GlyphStyle::Ascii, BoxShape::Rounded) => Self::uniform(['/', '\\', '\\', '/'], '-', '|'),
            (GlyphStyle::Ascii, BoxShape::Dotted) => Self::uniform(['.', '.', '\'', '\''], '.', ':'),
            (GlyphStyle::Ascii, BoxShape::Square) => Self::uniform(['+'; 4], '-', '|'),
            (GlyphStyle::Ascii, BoxShape::Double) => Self::uniform(['#'; 4], '=', '#'),
            (GlyphStyle::Unicode, BoxShape::Rounded) => Self::uniform(['╭', '╮', '╰', '╯'], '─', '│'),
            (GlyphStyle::Unicode, BoxShape::Dotted) => Self::uniform(['┌', '┐', '└', '┘'], '┄', '┆'),
            (GlyphStyle::Unicode, BoxShape::Square) => Self::uniform(['┌', '┐', '└', '┘'], '─', '│'),
            (GlyphStyle::Unicode, BoxShape::Double) => Self::uniform(['╔', '╗', '╚', '╝'], '═', '║'),
            (style, BoxShape::Angled) => {
                let (corners, horizontal) = match style {
                    GlyphStyle::Ascii => (['/', '\\', '\\', '/'], '-'),
                    GlyphStyle::Unicode => (['╱', '╲', '╲', '╱'], '─'),
                };
                Self {
                    left: '<',
                    right: '>',
                    ..Self::uniform(corners, horizontal, '|')
                }
            }
        }
    }
}

/// Rail directions leaving a cell
pub const NORTH: u8 = 1;
pub const EAST: u8 = 2;
pub const SOUTH: u8 = 4;
pub const WEST: u8 = 8;

/// Character for a rail cell joining the given directions
pub fn rail_glyph(bits: u8, style: GlyphStyle) -> char {
    let horizontal = bits & (EAST | WEST);
    let vertical = bits & (NORTH | SOUTH);
    if bits == 0 {
        return ' ';
    }
    if vertical == 0 {
        return match style {
            GlyphStyle::Ascii => '-',
            GlyphStyle::Unicode => '─',
        };
    }
    if horizontal == 0 {
        return match style {
            GlyphStyle::Ascii => '|',
            GlyphStyle::Unicode => '│',
        };
    }
    if style == GlyphStyle::Ascii {
        return '+';
    }
    match bits {
        b if b == EAST | SOUTH => '╭',
        b if b == WEST | SOUTH => '╮',
        b if b == NORTH | EAST => '╰',
        b if b == NORTH | WEST => '╯',
        b if b == NORTH | EAST | SOUTH => '├',
        b if b == NORTH | WEST | SOUTH => '┤',
        b if b == EAST | WEST | SOUTH => '┬',
        b if b == NORTH | EAST | WEST => '┴',
        _ => '┼',
    }
}
