//! Term trees to figure trees

use tracing::{debug, info_span, trace};

use super::shape::Shaper;
use super::{Diagram, Figure};
use crate::core::{BuilderOptions, RailyardError, Result};
use crate::grammar::{check_bounds, Grammar, Term};

/// Turns the productions of one grammar into diagrams
///
/// The builder holds no per-build state, so one instance serves any number
/// of requests and every request gets freshly built figures.
pub struct DiagramBuilder<'g> {
    grammar: &'g Grammar,
    shaper: Shaper,
    expand_any_case: bool,
}

impl<'g> DiagramBuilder<'g> {
    pub fn new(grammar: &'g Grammar, options: BuilderOptions) -> Self {
        Self {
            grammar,
            expand_any_case: options.expand_any_case,
            shaper: Shaper::new(options),
        }
    }

    /// Build one diagram per name, in request order
    pub fn build<I, S>(&self, roots: I) -> Result<Vec<Diagram>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let _span = info_span!("build", language = self.grammar.language()).entered();
        roots
            .into_iter()
            .map(|root| self.build_one(root.as_ref()))
            .collect()
    }

    /// Build every production in declaration order
    pub fn build_all(&self) -> Result<Vec<Diagram>> {
        self.build(self.grammar.names())
    }

    fn build_one(&self, name: &str) -> Result<Diagram> {
        let term = self
            .grammar
            .production(name)
            .ok_or_else(|| RailyardError::unresolved(name))?;
        let figure = self.figure(term)?;
        debug!(production = name, nodes = figure.node_count(), "Built diagram");
        Ok(Diagram::new(name, figure))
    }

    /// Build the figure for a single term
    pub fn figure(&self, term: &Term) -> Result<Figure> {
        let figure = match term {
            Term::Literal {
                text,
                case_sensitive,
            } => self.literal(text, *case_sensitive),
            Term::CharacterSet { class, exceptions } => Figure::Characters {
                class: class.clone(),
                exceptions: exceptions.clone(),
            },
            Term::NonTerminal { name } => {
                let body = self
                    .grammar
                    .production(name)
                    .ok_or_else(|| RailyardError::unresolved(name.as_str()))?;
                Figure::reference(name.as_str(), self.grammar.is_plural(body))
            }
            Term::Sequence { children } => self.shaper.line(self.figures(children)?),
            Term::Alternatives { children } => self.shaper.branch(self.figures(children)?),
            Term::Repeat {
                min,
                max,
                body,
                separator,
            } => {
                check_bounds(*min, *max)?;
                let body = self.figure(body)?;
                let separator = separator.as_deref().map(|s| self.figure(s)).transpose()?;
                self.shaper.repeat(*min, *max, body, separator)
            }
            Term::Epsilon => Figure::Nothing,
        };
        Ok(figure)
    }

    fn figures(&self, terms: &[Term]) -> Result<Vec<Figure>> {
        if terms.is_empty() {
            return Err(RailyardError::structural("group has no children"));
        }
        terms.iter().map(|t| self.figure(t)).collect()
    }

    fn literal(&self, text: &str, case_sensitive: bool) -> Figure {
        if text.is_empty() {
            return Figure::Nothing;
        }
        if case_sensitive || !text.chars().any(is_cased) {
            return Figure::text(text);
        }
        if !self.expand_any_case {
            return Figure::any_case(text);
        }

        trace!(literal = text, "Expanding case-insensitive literal");
        let mut items = Vec::new();
        let mut run = String::new();
        for c in text.chars() {
            if is_cased(c) {
                if !run.is_empty() {
                    items.push(Figure::text(std::mem::take(&mut run)));
                }
                items.push(self.shaper.branch(vec![
                    Figure::text(c.to_uppercase().collect::<String>()),
                    Figure::text(c.to_lowercase().collect::<String>()),
                ]));
            } else {
                run.push(c);
            }
        }
        if !run.is_empty() {
            items.push(Figure::text(run));
        }
        self.shaper.line(items)
    }
}

/// A character is cased when its upper and lower forms differ
fn is_cased(c: char) -> bool {
    !c.to_uppercase().eq(c.to_lowercase())
}

/// Build diagrams for `roots` in request order
pub fn build<I, S>(grammar: &Grammar, roots: I, options: BuilderOptions) -> Result<Vec<Diagram>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    DiagramBuilder::new(grammar, options).build(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::CharClass;
    use crate::grammar::GrammarBuilder;

    fn single(term: Term) -> Figure {
        single_with(term, BuilderOptions::default())
    }

    fn single_with(term: Term, options: BuilderOptions) -> Figure {
        let grammar = GrammarBuilder::new("test")
            .production("root", term)
            .production("item", Term::literal("x"))
            .build()
            .unwrap();
        build(&grammar, ["root"], options).unwrap().remove(0).figure().clone()
    }

    #[test]
    fn test_literal_variants() {
        assert_eq!(single(Term::literal("abc")), Figure::text("abc"));
        assert_eq!(single(Term::literal_any_case("abc")), Figure::any_case("abc"));
        assert_eq!(single(Term::literal_any_case("123")), Figure::text("123"));
        assert_eq!(single(Term::literal("")), Figure::Nothing);
    }

    #[test]
    fn test_any_case_expansion() {
        let figure = single_with(
            Term::literal_any_case("a1b"),
            BuilderOptions::new().expand_any_case(true),
        );
        assert_eq!(
            figure,
            Figure::line(vec![
                Figure::branch(vec![Figure::text("A"), Figure::text("a")]),
                Figure::text("1"),
                Figure::branch(vec![Figure::text("B"), Figure::text("b")]),
            ])
        );
    }

    #[test]
    fn test_character_set_leaf() {
        let figure = single(Term::characters(CharClass::named("LF")));
        assert_eq!(
            figure,
            Figure::Characters {
                class: CharClass::named("LF"),
                exceptions: vec![],
            }
        );
    }

    #[test]
    fn test_reference_plurality() {
        let grammar = GrammarBuilder::new("test")
            .production("list", Term::one_or_more(Term::non_terminal("item")))
            .production("item", Term::literal("x"))
            .production("root", Term::sequence([Term::non_terminal("list"), Term::non_terminal("item")]))
            .build()
            .unwrap();
        let diagrams = build(&grammar, ["root"], BuilderOptions::default()).unwrap();
        assert_eq!(
            diagrams[0].figure(),
            &Figure::line(vec![Figure::reference("list", true), Figure::reference("item", false)])
        );
    }

    #[test]
    fn test_unresolved_reference() {
        let grammar = GrammarBuilder::new("test")
            .production("root", Term::non_terminal("missing"))
            .build()
            .unwrap();
        let err = build(&grammar, ["root"], BuilderOptions::default()).unwrap_err();
        assert_eq!(err, RailyardError::unresolved("missing"));

        let err = build(&grammar, ["nope"], BuilderOptions::default()).unwrap_err();
        assert_eq!(err, RailyardError::unresolved("nope"));
    }

    #[test]
    fn test_optional_repeat() {
        let figure = single(Term::optional(Term::literal("x")));
        assert_eq!(figure, Figure::branch(vec![Figure::Nothing, Figure::text("x")]));
    }

    #[test]
    fn test_separated_repeat() {
        let figure = single(Term::separated(
            1,
            None,
            Term::non_terminal("item"),
            Term::literal(","),
        ));
        assert_eq!(
            figure,
            Figure::looped(Figure::reference("item", false), Some(Figure::text(",")), 0, None)
        );
    }

    #[test]
    fn test_build_all_in_declaration_order() {
        let grammar = GrammarBuilder::new("test")
            .production("b", Term::literal("1"))
            .production("a", Term::literal("2"))
            .build()
            .unwrap();
        let names: Vec<_> = DiagramBuilder::new(&grammar, BuilderOptions::default())
            .build_all()
            .unwrap()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn test_request_order_kept() {
        let grammar = GrammarBuilder::new("test")
            .production("a", Term::literal("1"))
            .production("b", Term::literal("2"))
            .build()
            .unwrap();
        let diagrams = build(&grammar, ["b", "a", "b"], BuilderOptions::default()).unwrap();
        let names: Vec<_> = diagrams.iter().map(Diagram::name).collect();
        assert_eq!(names, ["b", "a", "b"]);
    }
}
