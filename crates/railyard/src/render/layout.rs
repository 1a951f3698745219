//! Measure and draw passes over a figure tree
//!
//! Every measured node has its entry rail on the left edge and its exit
//! rail on the right edge, both `rail` below its top.

use super::{leaf_style, CanvasProvider, Curve, Heading, Point, Rect, Size, TextStyle};
use crate::core::RenderOptions;
use crate::diagram::Figure;

#[derive(Debug, Clone, PartialEq, Default)]
pub(super) struct Measured {
    pub size: Size,
    pub rail: f64,
    /// Loop-back rail of a loop, relative to the node top
    pub back_rail: f64,
    /// Child nodes with their offsets from this node's top-left corner
    pub children: Vec<(Point, Measured)>,
    /// Text extent of a leaf, or the count annotation of a loop
    pub label: Option<Rect>,
}

impl Measured {
    pub fn measure<C: CanvasProvider>(
        figure: &Figure,
        canvas: &mut C,
        o: &RenderOptions,
    ) -> Result<Self, C::Error> {
        let r = o.arc_radius;
        match figure {
            Figure::Nothing => Ok(Self::default()),
            Figure::Text { .. }
            | Figure::AnyCase { .. }
            | Figure::Characters { .. }
            | Figure::Reference { .. } => {
                let text = figure.label().unwrap_or_default();
                let style = leaf_style(figure).map_or(TextStyle::Terminal, |(_, style)| style);
                let extent = canvas.measure_text(&text, style)?;
                let size = Size::new(
                    extent.width + 2.0 * o.padding_x,
                    extent.height + 2.0 * o.padding_y,
                );
                Ok(Self {
                    size,
                    rail: size.height / 2.0,
                    label: Some(Rect::new(Point::new(o.padding_x, o.padding_y), extent)),
                    ..Self::default()
                })
            }
            Figure::Line { children } => {
                let measured = measure_all(children, canvas, o)?;
                let rail = measured.iter().map(|m| m.rail).fold(0.0, f64::max);
                let mut x = 0.0;
                let mut height: f64 = 0.0;
                let mut placed = Vec::with_capacity(measured.len());
                for (i, m) in measured.into_iter().enumerate() {
                    if i > 0 {
                        x += o.horizontal_gap;
                    }
                    let top = rail - m.rail;
                    height = height.max(top + m.size.height);
                    let width = m.size.width;
                    placed.push((Point::new(x, top), m));
                    x += width;
                }
                Ok(Self {
                    size: Size::new(x, height),
                    rail,
                    children: placed,
                    ..Self::default()
                })
            }
            Figure::Branch { alternatives } => {
                let measured = measure_all(alternatives, canvas, o)?;
                let Some(first) = measured.first() else {
                    return Ok(Self::default());
                };
                let inner = measured.iter().map(|m| m.size.width).fold(0.0, f64::max);
                let rail = first.rail;
                let mut bottom: f64 = 0.0;
                let mut previous_rail = rail;
                let mut placed = Vec::with_capacity(measured.len());
                for (i, m) in measured.into_iter().enumerate() {
                    let top = if i == 0 {
                        0.0
                    } else {
                        (bottom + o.vertical_gap).max(previous_rail + 2.0 * r - m.rail)
                    };
                    previous_rail = top + m.rail;
                    // an empty path still needs room for its rail
                    bottom = bottom.max(top + m.size.height).max(previous_rail + r);
                    placed.push((Point::new(2.0 * r, top), m));
                }
                Ok(Self {
                    size: Size::new(inner + 4.0 * r, bottom),
                    rail,
                    children: placed,
                    ..Self::default()
                })
            }
            Figure::Loop {
                body,
                separator,
                min,
                max,
            } => {
                let body = Self::measure(body, canvas, o)?;
                let separator = separator
                    .as_deref()
                    .map(|s| Self::measure(s, canvas, o))
                    .transpose()?;
                let annotation = match loop_annotation(*min, *max) {
                    Some(text) => Some(canvas.measure_text(&text, TextStyle::Annotation)?),
                    None => None,
                };

                let inner = [
                    Some(body.size.width),
                    separator.as_ref().map(|s| s.size.width),
                    annotation.map(|a| a.width),
                ]
                .into_iter()
                .flatten()
                .fold(0.0, f64::max);
                let centered = |width: f64| 2.0 * r + ((inner - width) / 2.0).floor();

                let rail = body.rail;
                let separator_rail = separator.as_ref().map_or(0.0, |s| s.rail);
                let back_rail = (body.size.height + o.vertical_gap + separator_rail)
                    .max(rail + 2.0 * r);
                let mut lower = body.size.height.max(back_rail + r);

                let mut children = vec![(Point::new(centered(body.size.width), 0.0), body)];
                if let Some(s) = separator {
                    lower = lower.max(back_rail - s.rail + s.size.height);
                    children.push((Point::new(centered(s.size.width), back_rail - s.rail), s));
                }
                let label = annotation.map(|a| Rect::new(Point::new(centered(a.width), lower), a));
                let height = lower + annotation.map_or(0.0, |a| a.height);

                Ok(Self {
                    size: Size::new(inner + 4.0 * r, height),
                    rail,
                    back_rail,
                    children,
                    label,
                })
            }
        }
    }

    pub fn draw<C: CanvasProvider>(
        &self,
        figure: &Figure,
        origin: Point,
        canvas: &mut C,
        o: &RenderOptions,
    ) -> Result<(), C::Error> {
        let r = o.arc_radius;
        let rail = origin.y + self.rail;
        match figure {
            Figure::Nothing => Ok(()),
            Figure::Text { .. }
            | Figure::AnyCase { .. }
            | Figure::Characters { .. }
            | Figure::Reference { .. } => {
                let Some((shape, style)) = leaf_style(figure) else {
                    return Ok(());
                };
                canvas.draw_box(Rect::new(origin, self.size), shape)?;
                if let Some(label) = self.label {
                    let text = figure.label().unwrap_or_default();
                    canvas.draw_text(offset(label, origin), &text, style)?;
                }
                Ok(())
            }
            Figure::Line { children } => {
                let mut previous_exit: Option<f64> = None;
                for (child, (at, m)) in children.iter().zip(&self.children) {
                    let at = origin.offset(at.x, at.y);
                    if let Some(exit) = previous_exit {
                        connect(canvas, Point::new(exit, rail), Point::new(at.x, rail))?;
                    }
                    m.draw(child, at, canvas, o)?;
                    previous_exit = Some(at.x + m.size.width);
                }
                Ok(())
            }
            Figure::Branch { alternatives } => {
                let left = origin.x;
                let right = origin.x + self.size.width;
                let inner_right = right - 2.0 * r;
                let mut last_rail = rail;
                for (i, (child, (at, m))) in alternatives.iter().zip(&self.children).enumerate() {
                    let at = origin.offset(at.x, at.y);
                    let alt_rail = at.y + m.rail;
                    if i == 0 {
                        connect(canvas, Point::new(left, rail), Point::new(at.x, rail))?;
                    } else {
                        canvas.draw_curve(Curve::new(
                            Point::new(left + r, alt_rail - r),
                            Point::new(left + 2.0 * r, alt_rail),
                            Heading::Vertical,
                        ))?;
                        canvas.draw_curve(Curve::new(
                            Point::new(inner_right, alt_rail),
                            Point::new(inner_right + r, alt_rail - r),
                            Heading::Horizontal,
                        ))?;
                    }
                    m.draw(child, at, canvas, o)?;
                    let exit = at.x + m.size.width;
                    let end = if i == 0 { right } else { inner_right };
                    connect(canvas, Point::new(exit, alt_rail), Point::new(end, alt_rail))?;
                    last_rail = alt_rail;
                }
                if self.children.len() > 1 {
                    // Shared down and up rails on either side of the stack
                    canvas.draw_curve(Curve::new(
                        Point::new(left, rail),
                        Point::new(left + r, rail + r),
                        Heading::Horizontal,
                    ))?;
                    connect(
                        canvas,
                        Point::new(left + r, rail + r),
                        Point::new(left + r, last_rail - r),
                    )?;
                    connect(
                        canvas,
                        Point::new(inner_right + r, last_rail - r),
                        Point::new(inner_right + r, rail + r),
                    )?;
                    canvas.draw_curve(Curve::new(
                        Point::new(inner_right + r, rail + r),
                        Point::new(right, rail),
                        Heading::Vertical,
                    ))?;
                }
                Ok(())
            }
            Figure::Loop {
                body, separator, ..
            } => {
                let left = origin.x;
                let right = origin.x + self.size.width;
                let inner_left = left + 2.0 * r;
                let inner_right = right - 2.0 * r;
                let back = origin.y + self.back_rail;

                let (body_at, body_m) = &self.children[0];
                let body_at = origin.offset(body_at.x, body_at.y);
                connect(canvas, Point::new(left, rail), Point::new(body_at.x, rail))?;
                body_m.draw(body, body_at, canvas, o)?;
                connect(
                    canvas,
                    Point::new(body_at.x + body_m.size.width, rail),
                    Point::new(right, rail),
                )?;

                // Down the right side, back along the loop-back rail, up the left
                canvas.draw_curve(Curve::new(
                    Point::new(inner_right, rail),
                    Point::new(inner_right + r, rail + r),
                    Heading::Horizontal,
                ))?;
                connect(
                    canvas,
                    Point::new(inner_right + r, rail + r),
                    Point::new(inner_right + r, back - r),
                )?;
                canvas.draw_curve(Curve::new(
                    Point::new(inner_right + r, back - r),
                    Point::new(inner_right, back),
                    Heading::Vertical,
                ))?;
                match (separator.as_deref(), self.children.get(1)) {
                    (Some(sep), Some((sep_at, sep_m))) => {
                        let sep_at = origin.offset(sep_at.x, sep_at.y);
                        connect(
                            canvas,
                            Point::new(inner_right, back),
                            Point::new(sep_at.x + sep_m.size.width, back),
                        )?;
                        sep_m.draw(sep, sep_at, canvas, o)?;
                        connect(canvas, Point::new(sep_at.x, back), Point::new(inner_left, back))?;
                    }
                    _ => connect(canvas, Point::new(inner_right, back), Point::new(inner_left, back))?,
                }
                canvas.draw_curve(Curve::new(
                    Point::new(inner_left, back),
                    Point::new(left + r, back - r),
                    Heading::Horizontal,
                ))?;
                connect(
                    canvas,
                    Point::new(left + r, back - r),
                    Point::new(left + r, rail + r),
                )?;
                canvas.draw_curve(Curve::new(
                    Point::new(left + r, rail + r),
                    Point::new(inner_left, rail),
                    Heading::Vertical,
                ))?;

                if let (Some(label), Figure::Loop { min, max, .. }) = (self.label, figure) {
                    if let Some(text) = loop_annotation(*min, *max) {
                        canvas.draw_text(offset(label, origin), &text, TextStyle::Annotation)?;
                    }
                }
                Ok(())
            }
        }
    }
}

fn measure_all<C: CanvasProvider>(
    figures: &[Figure],
    canvas: &mut C,
    o: &RenderOptions,
) -> Result<Vec<Measured>, C::Error> {
    figures.iter().map(|f| Measured::measure(f, canvas, o)).collect()
}

/// Draw a straight rail unless it has no length
pub(super) fn connect<C: CanvasProvider>(
    canvas: &mut C,
    from: Point,
    to: Point,
) -> Result<(), C::Error> {
    if from == to {
        return Ok(());
    }
    canvas.draw_connector(from, to)
}

fn offset(rect: Rect, by: Point) -> Rect {
    Rect {
        x: rect.x + by.x,
        y: rect.y + by.y,
        ..rect
    }
}

/// Body traversal counts shown under a loop whose bounds are not the
/// default "one or more"
pub(super) fn loop_annotation(min: u32, max: Option<u32>) -> Option<String> {
    let lowest = min.saturating_add(1);
    match max {
        None if min == 0 => None,
        None => Some(format!("{lowest}..*")),
        Some(max) if max == min => Some(format!("{lowest}")),
        Some(max) => Some(format!("{lowest}..{}", max.saturating_add(1))),
    }
}
