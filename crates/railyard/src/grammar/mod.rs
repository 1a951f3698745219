//! Grammar model
//!
//! A [`Grammar`] is an immutable, declaration-ordered collection of named
//! productions. It is assembled once through [`GrammarBuilder`], which
//! normalizes and validates every right-hand side.
//!
//! ```
//! use railyard::grammar::{GrammarBuilder, Term};
//!
//! let grammar = GrammarBuilder::new("json")
//!     .production("value", Term::one_of([
//!         Term::non_terminal("number"),
//!         Term::literal("null"),
//!     ]))
//!     .production("number", Term::one_or_more(Term::characters_of_set("[0-9]").unwrap()))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(grammar.language(), "json");
//! assert!(grammar.production("value").is_some());
//! ```

mod normalize;
mod term;

pub use term::Term;
pub(crate) use term::check_bounds;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{RailyardError, Result};

/// A named production
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Production {
    pub name: String,
    pub term: Term,
}

/// Serialized form of a grammar: `{ language, productions: [{ name, term }] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarDocument {
    #[serde(default)]
    pub language: String,
    pub productions: Vec<Production>,
}

/// An immutable set of named productions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GrammarDocument", into = "GrammarDocument")]
pub struct Grammar {
    language: String,
    productions: Vec<Production>,
    index: HashMap<String, usize>,
}

impl Grammar {
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn production(&self, name: &str) -> Option<&Term> {
        self.index.get(name).map(|&i| &self.productions[i].term)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Productions in declaration order
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.productions.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    /// Whether `term` stands for a repeated construct
    ///
    /// Repeats allowing more than one occurrence are plural. Non-terminals
    /// and single-child groups are looked through; recursion through
    /// non-terminals stops at the first revisit.
    pub fn is_plural(&self, term: &Term) -> bool {
        self.is_plural_inner(term, &mut HashSet::new())
    }

    fn is_plural_inner<'a>(&'a self, term: &'a Term, visiting: &mut HashSet<&'a str>) -> bool {
        match term {
            Term::Repeat { max, .. } => max.map_or(true, |max| max > 1),
            Term::Sequence { children } | Term::Alternatives { children } => match children.as_slice() {
                [only] => self.is_plural_inner(only, visiting),
                _ => false,
            },
            Term::NonTerminal { name } => {
                if !visiting.insert(name.as_str()) {
                    return false;
                }
                self.production(name)
                    .is_some_and(|body| self.is_plural_inner(body, visiting))
            }
            Term::Literal { .. } | Term::CharacterSet { .. } | Term::Epsilon => false,
        }
    }
}

impl TryFrom<GrammarDocument> for Grammar {
    type Error = RailyardError;

    fn try_from(document: GrammarDocument) -> Result<Self> {
        document
            .productions
            .into_iter()
            .fold(GrammarBuilder::new(document.language), |builder, p| {
                builder.production(p.name, p.term)
            })
            .build()
    }
}

impl From<Grammar> for GrammarDocument {
    fn from(grammar: Grammar) -> Self {
        Self {
            language: grammar.language,
            productions: grammar.productions,
        }
    }
}

/// Accumulates productions into a [`Grammar`]
#[derive(Debug, Clone, Default)]
pub struct GrammarBuilder {
    language: String,
    productions: Vec<Production>,
}

impl GrammarBuilder {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            productions: Vec::new(),
        }
    }

    pub fn production(mut self, name: impl Into<String>, term: Term) -> Self {
        self.productions.push(Production {
            name: name.into(),
            term,
        });
        self
    }

    pub fn add_production(&mut self, name: impl Into<String>, term: Term) -> &mut Self {
        self.productions.push(Production {
            name: name.into(),
            term,
        });
        self
    }

    /// Normalize every production and freeze the grammar
    ///
    /// Fails on duplicate names and on structurally invalid terms.
    /// References are not checked here: forward references are legal and
    /// missing targets surface when diagrams are built.
    pub fn build(self) -> Result<Grammar> {
        let mut index = HashMap::with_capacity(self.productions.len());
        let mut productions = Vec::with_capacity(self.productions.len());
        for production in self.productions {
            if index.contains_key(&production.name) {
                return Err(RailyardError::duplicate(production.name));
            }
            let term = normalize::normalize(production.term)?;
            index.insert(production.name.clone(), productions.len());
            productions.push(Production {
                name: production.name,
                term,
            });
        }
        debug!(
            language = %self.language,
            productions = productions.len(),
            "Built grammar"
        );
        Ok(Grammar {
            language: self.language,
            productions,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::CharClass;

    fn list_grammar() -> Grammar {
        GrammarBuilder::new("test")
            .production(
                "list",
                Term::sequence([
                    Term::non_terminal("item"),
                    Term::zero_or_more(Term::sequence([
                        Term::literal(","),
                        Term::non_terminal("item"),
                    ])),
                ]),
            )
            .production("item", Term::literal("x"))
            .production("items", Term::one_or_more(Term::non_terminal("item")))
            .production("alias", Term::non_terminal("items"))
            .production("maybe", Term::optional(Term::non_terminal("item")))
            .production("loop_a", Term::non_terminal("loop_b"))
            .production("loop_b", Term::non_terminal("loop_a"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_lookup_and_order() {
        let grammar = list_grammar();
        assert_eq!(grammar.language(), "test");
        assert_eq!(grammar.len(), 7);
        assert!(grammar.contains("item"));
        assert!(grammar.production("missing").is_none());
        let names: Vec<_> = grammar.names().collect();
        assert_eq!(names[0], "list");
        assert_eq!(names[1], "item");
    }

    #[test]
    fn test_duplicate_production_rejected() {
        let err = GrammarBuilder::new("dup")
            .production("a", Term::literal("x"))
            .production("a", Term::literal("y"))
            .build()
            .unwrap_err();
        assert_eq!(err, RailyardError::duplicate("a"));
    }

    #[test]
    fn test_build_normalizes_control_literals() {
        let grammar = GrammarBuilder::new("ctl")
            .production("newline", Term::literal("\n"))
            .build()
            .unwrap();
        assert_eq!(
            grammar.production("newline"),
            Some(&Term::characters(CharClass::named("LF")))
        );
    }

    #[test]
    fn test_forward_references_allowed() {
        let grammar = GrammarBuilder::new("fwd")
            .production("a", Term::non_terminal("nowhere"))
            .build();
        assert!(grammar.is_ok());
    }

    #[test]
    fn test_is_plural() {
        let grammar = list_grammar();
        let plural = |name: &str| grammar.is_plural(&Term::non_terminal(name));
        assert!(plural("items"));
        assert!(plural("alias"));
        assert!(!plural("item"));
        assert!(!plural("list"));
        assert!(!plural("maybe"));
        assert!(!plural("loop_a"));
        assert!(!plural("undefined"));
    }

    #[test]
    fn test_add_production_in_place() {
        let mut builder = GrammarBuilder::new("inc");
        builder
            .add_production("a", Term::literal("a"))
            .add_production("b", Term::non_terminal("a"));
        let grammar = builder.build().unwrap();
        assert_eq!(grammar.len(), 2);
    }

    #[test]
    fn test_serde_round_trip() {
        let grammar = list_grammar();
        let json = serde_json::to_string(&grammar).unwrap();
        let back: Grammar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grammar);
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let json = r#"{"language":"bad","productions":[
            {"name":"a","term":{"kind":"sequence","children":[]}}
        ]}"#;
        let err = serde_json::from_str::<Grammar>(json).unwrap_err();
        assert!(err.to_string().contains("at least one child"));
    }
}
