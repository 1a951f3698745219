//! Grammar terms: the right-hand sides of productions

use serde::{Deserialize, Serialize};

use crate::charset::{CharClass, CodePointSet};
use crate::core::{RailyardError, Result};

fn case_sensitive_default() -> bool {
    true
}

/// A grammar AST node
///
/// Non-terminals are stored by name and resolved through the owning
/// [`Grammar`](super::Grammar), so recursive productions need no cycles.
/// The constructors flatten `Sequence`-in-`Sequence` and
/// `Alternatives`-in-`Alternatives` as they go.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Term {
    Literal {
        text: String,
        #[serde(default = "case_sensitive_default")]
        case_sensitive: bool,
    },
    CharacterSet {
        class: CharClass,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exceptions: Vec<CharClass>,
    },
    NonTerminal {
        name: String,
    },
    Sequence {
        children: Vec<Term>,
    },
    Alternatives {
        children: Vec<Term>,
    },
    /// `max: None` is unbounded
    Repeat {
        min: u32,
        #[serde(default)]
        max: Option<u32>,
        body: Box<Term>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        separator: Option<Box<Term>>,
    },
    Epsilon,
}

impl Term {
    pub fn literal(text: impl Into<String>) -> Self {
        Term::Literal {
            text: text.into(),
            case_sensitive: true,
        }
    }

    pub fn literal_any_case(text: impl Into<String>) -> Self {
        Term::Literal {
            text: text.into(),
            case_sensitive: false,
        }
    }

    pub fn non_terminal(name: impl Into<String>) -> Self {
        Term::NonTerminal { name: name.into() }
    }

    pub fn epsilon() -> Self {
        Term::Epsilon
    }

    pub fn characters(class: CharClass) -> Self {
        Term::CharacterSet {
            class,
            exceptions: Vec::new(),
        }
    }

    /// A character-set term from either a bracket expression or a class name
    ///
    /// Text starting with `[` is parsed with [`CodePointSet::parse`];
    /// anything else names a class.
    ///
    /// # Example
    /// ```
    /// use railyard::grammar::Term;
    ///
    /// assert!(Term::characters_of_set("[0-9]").is_ok());
    /// assert!(Term::characters_of_set("LF").is_ok());
    /// assert!(Term::characters_of_set("[0-").is_err());
    /// ```
    pub fn characters_of_set(text: &str) -> Result<Self> {
        let class = if text.starts_with('[') {
            CharClass::Set(CodePointSet::parse(text)?)
        } else {
            CharClass::named(text)
        };
        Ok(Self::characters(class))
    }

    /// This character-set term minus `exception`
    ///
    /// Returns the term unchanged when it is not a character set.
    pub fn except(self, exception: CharClass) -> Self {
        match self {
            Term::CharacterSet {
                class,
                mut exceptions,
            } => {
                exceptions.push(exception);
                Term::CharacterSet { class, exceptions }
            }
            other => other,
        }
    }

    /// # Panics
    ///
    /// Panics when `children` is empty; see [`Term::try_sequence`].
    pub fn sequence(children: impl IntoIterator<Item = Term>) -> Self {
        match Self::try_sequence(children) {
            Ok(term) => term,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_sequence(children: impl IntoIterator<Item = Term>) -> Result<Self> {
        let children = flatten(children, |term| match term {
            Term::Sequence { children } => Ok(children),
            other => Err(other),
        });
        if children.is_empty() {
            return Err(RailyardError::structural("a sequence needs at least one child"));
        }
        Ok(Term::Sequence { children })
    }

    /// # Panics
    ///
    /// Panics when `children` is empty; see [`Term::try_one_of`].
    pub fn one_of(children: impl IntoIterator<Item = Term>) -> Self {
        match Self::try_one_of(children) {
            Ok(term) => term,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_one_of(children: impl IntoIterator<Item = Term>) -> Result<Self> {
        let children = flatten(children, |term| match term {
            Term::Alternatives { children } => Ok(children),
            other => Err(other),
        });
        if children.is_empty() {
            return Err(RailyardError::structural(
                "an alternative set needs at least one child",
            ));
        }
        Ok(Term::Alternatives { children })
    }

    pub fn zero_or_more(body: Term) -> Self {
        Self::repeat(0, None, body)
    }

    pub fn one_or_more(body: Term) -> Self {
        Self::repeat(1, None, body)
    }

    pub fn optional(body: Term) -> Self {
        Self::repeat(0, Some(1), body)
    }

    /// # Panics
    ///
    /// Panics when `min > max`; see [`Term::try_repeat`].
    pub fn repeat(min: u32, max: Option<u32>, body: Term) -> Self {
        match Self::try_repeat(min, max, body, None) {
            Ok(term) => term,
            Err(err) => panic!("{}", err),
        }
    }

    /// Repetition with `separator` between consecutive occurrences
    ///
    /// # Panics
    ///
    /// Panics when `min > max`; see [`Term::try_repeat`].
    pub fn separated(min: u32, max: Option<u32>, body: Term, separator: Term) -> Self {
        match Self::try_repeat(min, max, body, Some(separator)) {
            Ok(term) => term,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_repeat(
        min: u32,
        max: Option<u32>,
        body: Term,
        separator: Option<Term>,
    ) -> Result<Self> {
        check_bounds(min, max)?;
        Ok(Term::Repeat {
            min,
            max,
            body: Box::new(body),
            separator: separator.map(Box::new),
        })
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Term::Epsilon)
    }
}

pub(crate) fn check_bounds(min: u32, max: Option<u32>) -> Result<()> {
    match max {
        Some(max) if min > max => Err(RailyardError::structural(format!(
            "repeat minimum {} exceeds maximum {}",
            min, max
        ))),
        _ => Ok(()),
    }
}

/// Splice children that `unwrap` recognizes as the same group kind
pub(crate) fn flatten(
    children: impl IntoIterator<Item = Term>,
    unwrap: impl Fn(Term) -> std::result::Result<Vec<Term>, Term> + Copy,
) -> Vec<Term> {
    let mut flat = Vec::new();
    for child in children {
        match unwrap(child) {
            Ok(nested) => flat.extend(flatten(nested, unwrap)),
            Err(term) => flat.push(term),
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_flattens_nested_sequences() {
        let term = Term::sequence([
            Term::literal("a"),
            Term::sequence([Term::literal("b"), Term::sequence([Term::literal("c")])]),
        ]);
        assert_eq!(
            term,
            Term::Sequence {
                children: vec![Term::literal("a"), Term::literal("b"), Term::literal("c")]
            }
        );
    }

    #[test]
    fn test_one_of_flattens_nested_alternatives() {
        let term = Term::one_of([
            Term::one_of([Term::literal("a"), Term::literal("b")]),
            Term::literal("c"),
        ]);
        match term {
            Term::Alternatives { children } => assert_eq!(children.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_sequence_keeps_nested_alternatives() {
        let term = Term::sequence([Term::one_of([Term::literal("a"), Term::literal("b")])]);
        match term {
            Term::Sequence { children } => {
                assert!(matches!(children[0], Term::Alternatives { .. }))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_try_sequence_rejects_empty() {
        let err = Term::try_sequence(Vec::new()).unwrap_err();
        assert!(matches!(err, RailyardError::StructuralInvariant { .. }));
    }

    #[test]
    fn test_try_one_of_rejects_empty() {
        assert!(Term::try_one_of(Vec::new()).is_err());
    }

    #[test]
    #[should_panic(expected = "at least one child")]
    fn test_sequence_panics_on_empty() {
        let _ = Term::sequence(Vec::new());
    }

    #[test]
    fn test_repeat_bounds() {
        assert!(Term::try_repeat(2, Some(1), Term::literal("x"), None).is_err());
        assert!(Term::try_repeat(1, Some(1), Term::literal("x"), None).is_ok());
        assert!(Term::try_repeat(5, None, Term::literal("x"), None).is_ok());
    }

    #[test]
    fn test_shorthand_repeats() {
        assert!(matches!(
            Term::zero_or_more(Term::literal("x")),
            Term::Repeat { min: 0, max: None, .. }
        ));
        assert!(matches!(
            Term::one_or_more(Term::literal("x")),
            Term::Repeat { min: 1, max: None, .. }
        ));
        assert!(matches!(
            Term::optional(Term::literal("x")),
            Term::Repeat { min: 0, max: Some(1), .. }
        ));
    }

    #[test]
    fn test_characters_of_set() {
        let digits = Term::characters_of_set("[0-9]").unwrap();
        assert_eq!(
            digits,
            Term::characters(CharClass::Set(CodePointSet::range('0', '9')))
        );
        let named = Term::characters_of_set("Letter").unwrap();
        assert_eq!(named, Term::characters(CharClass::named("Letter")));
    }

    #[test]
    fn test_except_adds_exception() {
        let term = Term::characters_of_set("[a-z]")
            .unwrap()
            .except(CharClass::Set(CodePointSet::single('q')));
        match term {
            Term::CharacterSet { exceptions, .. } => assert_eq!(exceptions.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_serde_tagging() {
        let term = Term::sequence([Term::non_terminal("item"), Term::epsilon()]);
        let json = serde_json::to_value(&term).unwrap();
        assert_eq!(json["kind"], "sequence");
        assert_eq!(json["children"][0]["kind"], "non_terminal");
        assert_eq!(json["children"][1]["kind"], "epsilon");
        let back: Term = serde_json::from_value(json).unwrap();
        assert_eq!(back, term);
    }

    #[test]
    fn test_serde_literal_defaults_to_case_sensitive() {
        let term: Term = serde_json::from_str(r#"{"kind":"literal","text":"if"}"#).unwrap();
        assert_eq!(term, Term::literal("if"));
    }
}
