//! SVG backend
//!
//! Builds a standalone SVG document as a string. Every number goes through
//! [`format_number`], so documents are byte-identical whatever the process
//! locale.

use std::fmt::{self, Write};

use tracing::trace;

use crate::core::{display_width, format_number};
use crate::render::{BoxShape, CanvasProvider, Curve, Point, Rect, Size, TextStyle};

const STYLE: &str = "\
path.rail{fill:none;stroke:#333;stroke-width:1.5}\
rect,polygon{fill:#fff;stroke:#333;stroke-width:1.5}\
rect.any-case{stroke-dasharray:4 2}\
text{font-family:monospace;font-size:14px;text-anchor:middle;dominant-baseline:central}\
text.title{font-weight:bold;text-anchor:start}\
text.annotation{font-size:10px}";

/// Retained-document canvas producing SVG markup
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    char_width: f64,
    line_height: f64,
    corner_radius: f64,
    document: String,
}

impl SvgCanvas {
    pub fn new() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
            corner_radius: 10.0,
            document: String::new(),
        }
    }

    /// Use a different fixed-pitch font metric
    pub fn with_metrics(mut self, char_width: f64, line_height: f64) -> Self {
        self.char_width = char_width;
        self.line_height = line_height;
        self
    }

    fn rect(&mut self, bounds: Rect, class: &str, radius: f64) -> fmt::Result {
        write!(
            self.document,
            r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}""#,
            class,
            format_number(bounds.x),
            format_number(bounds.y),
            format_number(bounds.width),
            format_number(bounds.height),
        )?;
        if radius > 0.0 {
            let radius = format_number(radius);
            write!(self.document, r#" rx="{radius}" ry="{radius}""#)?;
        }
        writeln!(self.document, "/>")
    }
}

impl Default for SvgCanvas {
    fn default() -> Self {
        Self::new()
    }
}

fn point(p: Point) -> String {
    format!("{} {}", format_number(p.x), format_number(p.y))
}

fn style_class(style: TextStyle) -> &'static str {
    match style {
        TextStyle::Terminal => "terminal",
        TextStyle::AnyCase => "any-case",
        TextStyle::NonTerminal => "nonterminal",
        TextStyle::CharSet => "charset",
        TextStyle::Annotation => "annotation",
        TextStyle::Title => "title",
    }
}

/// Escape text for use in element content and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {
                // not representable in XML 1.0
                escaped.push('\u{FFFD}');
            }
            c => escaped.push(c),
        }
    }
    escaped
}

impl CanvasProvider for SvgCanvas {
    type Output = String;
    type Error = fmt::Error;

    fn name(&self) -> &'static str {
        "svg"
    }

    fn format(&self) -> &'static str {
        "image/svg+xml"
    }

    fn measure_text(&mut self, text: &str, style: TextStyle) -> Result<Size, fmt::Error> {
        let scale = match style {
            TextStyle::Annotation => 0.75,
            _ => 1.0,
        };
        Ok(Size::new(
            display_width(text) as f64 * self.char_width * scale,
            self.line_height * scale,
        ))
    }

    fn begin(&mut self, size: Size) -> Result<(), fmt::Error> {
        trace!(width = size.width, height = size.height, "Starting SVG document");
        self.document.clear();
        let (width, height) = (format_number(size.width), format_number(size.height));
        writeln!(
            self.document,
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="railroad-diagram" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#,
        )?;
        writeln!(self.document, "<style>{STYLE}</style>")
    }

    fn draw_connector(&mut self, from: Point, to: Point) -> Result<(), fmt::Error> {
        let leg = if from.y == to.y {
            format!("H{}", format_number(to.x))
        } else if from.x == to.x {
            format!("V{}", format_number(to.y))
        } else {
            format!("L{}", point(to))
        };
        writeln!(self.document, r#"<path class="rail" d="M{} {}"/>"#, point(from), leg)
    }

    fn draw_curve(&mut self, curve: Curve) -> Result<(), fmt::Error> {
        writeln!(
            self.document,
            r#"<path class="rail" d="M{} Q{} {}"/>"#,
            point(curve.from),
            point(curve.corner()),
            point(curve.to),
        )
    }

    fn draw_box(&mut self, bounds: Rect, shape: BoxShape) -> Result<(), fmt::Error> {
        match shape {
            BoxShape::Rounded => self.rect(bounds, "terminal", self.corner_radius),
            BoxShape::Dotted => self.rect(bounds, "any-case", self.corner_radius),
            BoxShape::Square => self.rect(bounds, "nonterminal", 0.0),
            BoxShape::Double => {
                self.rect(bounds, "nonterminal plural", 0.0)?;
                self.rect(bounds.inset(3.0, 3.0), "nonterminal plural", 0.0)
            }
            BoxShape::Angled => {
                let slant = (bounds.height / 2.0).min(bounds.width / 2.0);
                let middle = bounds.y + bounds.height / 2.0;
                let points = [
                    Point::new(bounds.x + slant, bounds.y),
                    Point::new(bounds.right() - slant, bounds.y),
                    Point::new(bounds.right(), middle),
                    Point::new(bounds.right() - slant, bounds.bottom()),
                    Point::new(bounds.x + slant, bounds.bottom()),
                    Point::new(bounds.x, middle),
                ];
                let points: Vec<String> = points
                    .iter()
                    .map(|p| format!("{},{}", format_number(p.x), format_number(p.y)))
                    .collect();
                writeln!(
                    self.document,
                    r#"<polygon class="charset" points="{}"/>"#,
                    points.join(" ")
                )
            }
        }
    }

    fn draw_text(&mut self, bounds: Rect, text: &str, style: TextStyle) -> Result<(), fmt::Error> {
        let x = match style {
            TextStyle::Title => bounds.x,
            _ => bounds.x + bounds.width / 2.0,
        };
        writeln!(
            self.document,
            r#"<text class="{}" x="{}" y="{}">{}</text>"#,
            style_class(style),
            format_number(x),
            format_number(bounds.y + bounds.height / 2.0),
            escape_xml(text),
        )
    }

    fn finish(&mut self) -> Result<String, fmt::Error> {
        writeln!(self.document, "</svg>")?;
        Ok(std::mem::take(&mut self.document))
    }
}
