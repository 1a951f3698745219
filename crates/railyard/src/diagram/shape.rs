//! Rewrite rules that keep figure trees minimal
//!
//! Every figure the builder emits goes through [`Shaper::line`],
//! [`Shaper::branch`] or [`Shaper::repeat`], which together guarantee that
//! lines never nest lines, branches never nest branches, singleton wrappers
//! disappear and `Nothing` only survives as a branch alternative.

use tracing::trace;

use super::Figure;
use crate::core::BuilderOptions;

pub(crate) struct Shaper {
    options: BuilderOptions,
}

impl Shaper {
    pub(crate) fn new(options: BuilderOptions) -> Self {
        Self { options }
    }

    /// Join figures left to right
    pub(crate) fn line(&self, items: Vec<Figure>) -> Figure {
        let mut flat: Vec<Figure> = items.into_iter().flat_map(Figure::into_items).collect();
        if self.options.collapse_separator_loops {
            flat = self.collapse_separator_loops(flat);
        }
        wrap_line(flat)
    }

    /// Offer `alternatives` as parallel paths
    pub(crate) fn branch(&self, alternatives: Vec<Figure>) -> Figure {
        let mut flat: Vec<Figure> = Vec::with_capacity(alternatives.len());
        for alternative in alternatives {
            let nested = match alternative {
                Figure::Branch { alternatives } => alternatives,
                other => vec![other],
            };
            for figure in nested {
                if !flat.contains(&figure) {
                    flat.push(figure);
                }
            }
        }

        if flat.iter().all(Figure::is_nothing) {
            return Figure::Nothing;
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        if self.options.factor_affixes {
            if let Some(factored) = self.factor_affixes(&flat) {
                return factored;
            }
        }
        Figure::Branch { alternatives: flat }
    }

    /// Repeat `body` between `min` and `max` times (`None` is unbounded)
    pub(crate) fn repeat(
        &self,
        min: u32,
        max: Option<u32>,
        body: Figure,
        separator: Option<Figure>,
    ) -> Figure {
        let separator = separator.filter(|s| !s.is_nothing());
        if max == Some(0) {
            return Figure::Nothing;
        }
        if body.is_nothing() {
            // ε (s ε)* is just a run of separators, one fewer than the count
            return match separator {
                Some(separator) => self.repeat(
                    min.saturating_sub(1),
                    max.map(|m| m - 1),
                    separator,
                    None,
                ),
                None => Figure::Nothing,
            };
        }

        let repeated = if max == Some(1) {
            body
        } else if separator.is_none() && max.is_none() {
            match self.merge_nested_loop(min, body) {
                Ok(merged) => merged,
                Err(body) => Figure::looped(body, None, min.saturating_sub(1), None),
            }
        } else {
            Figure::looped(
                body,
                separator,
                min.saturating_sub(1),
                max.map(|m| m - 1),
            )
        };

        if min == 0 {
            self.branch(vec![Figure::Nothing, repeated])
        } else {
            repeated
        }
    }

    /// Unbounded repetition of a body that is itself an unbounded loop
    ///
    /// `(x (s x)*)+` becomes one loop whose loop-back may skip `s`, and
    /// `(x*){n,}` is just `x*`. A loop body only merges while the outer
    /// minimum is at most one, since `(x+){3,}` needs three `x`. Returns the
    /// body untouched when it does not fit.
    fn merge_nested_loop(&self, min: u32, body: Figure) -> Result<Figure, Figure> {
        match body {
            Figure::Loop {
                body,
                separator,
                min: 0,
                max: None,
            } if min <= 1 => {
                let separator = separator.map(|s| self.branch(vec![Figure::Nothing, *s]));
                trace!("Merged nested unbounded loops");
                Ok(Figure::looped(*body, separator, 0, None))
            }
            Figure::Branch { alternatives } if is_optional_unbounded_loop(&alternatives) => {
                trace!("Merged repeat of an optional loop");
                Ok(Figure::Branch { alternatives })
            }
            other => Err(other),
        }
    }

    /// Factor the runs every alternative starts and ends with
    ///
    /// The longest common prefix is taken first; the common suffix is then
    /// searched only in what remains of each alternative, so the two never
    /// overlap.
    fn factor_affixes(&self, alternatives: &[Figure]) -> Option<Figure> {
        let items: Vec<Vec<Figure>> = alternatives
            .iter()
            .map(|a| a.clone().into_items())
            .collect();
        let shortest = items.iter().map(Vec::len).min().unwrap_or(0);

        let prefix = (0..shortest)
            .take_while(|&i| items.iter().all(|alt| alt[i] == items[0][i]))
            .count();
        let suffix = (0..shortest - prefix)
            .take_while(|&i| {
                let expected = &items[0][items[0].len() - 1 - i];
                items.iter().all(|alt| &alt[alt.len() - 1 - i] == expected)
            })
            .count();
        if prefix == 0 && suffix == 0 {
            return None;
        }
        trace!(prefix, suffix, alternatives = items.len(), "Factored common affixes");

        let first = &items[0];
        let mut line: Vec<Figure> = first[..prefix].to_vec();
        let middles = items
            .iter()
            .map(|alt| self.line(alt[prefix..alt.len() - suffix].to_vec()))
            .collect();
        line.push(self.branch(middles));
        line.extend_from_slice(&first[first.len() - suffix..]);
        Some(self.line(line))
    }

    /// Fold `x (s x)*` into a separated loop
    ///
    /// Looks for a loop whose body ends with the figures immediately before
    /// it; the leading remainder of the body becomes the separator. The
    /// longest such match wins.
    fn collapse_separator_loops(&self, items: Vec<Figure>) -> Vec<Figure> {
        let mut out: Vec<Figure> = Vec::with_capacity(items.len());
        for item in items {
            let Some((unit, min, max)) = repeated_unit(&item) else {
                out.push(item);
                continue;
            };
            let longest = (1..=unit.len().min(out.len()))
                .rev()
                .find(|&k| out[out.len() - k..] == unit[unit.len() - k..]);
            match longest {
                Some(k) => {
                    let body = wrap_line(out.split_off(out.len() - k));
                    let separator = &unit[..unit.len() - k];
                    let separator = (!separator.is_empty()).then(|| wrap_line(separator.to_vec()));
                    trace!(body_len = k, "Collapsed separator loop");
                    out.push(Figure::looped(body, separator, min, max));
                }
                None => out.push(item),
            }
        }
        out
    }
}

/// Wrap already-flat items without further rewriting
fn wrap_line(mut items: Vec<Figure>) -> Figure {
    match items.len() {
        0 => Figure::Nothing,
        1 => items.remove(0),
        _ => Figure::Line { children: items },
    }
}

fn is_optional_unbounded_loop(alternatives: &[Figure]) -> bool {
    matches!(
        alternatives,
        [Figure::Nothing, Figure::Loop { separator: None, min: 0, max: None, .. }]
    )
}

/// The figures a separator-free loop repeats, with the bounds on how many
/// times that unit occurs
fn repeated_unit(figure: &Figure) -> Option<(Vec<Figure>, u32, Option<u32>)> {
    match figure {
        Figure::Loop {
            body,
            separator: None,
            min,
            max,
        } => Some((
            body.as_ref().clone().into_items(),
            min + 1,
            max.map(|m| m + 1),
        )),
        Figure::Branch { alternatives } => match alternatives.as_slice() {
            [Figure::Nothing, Figure::Loop {
                body,
                separator: None,
                min: 0,
                max,
            }] => Some((body.as_ref().clone().into_items(), 0, max.map(|m| m + 1))),
            _ => None,
        },
        _ => None,
    }
}
