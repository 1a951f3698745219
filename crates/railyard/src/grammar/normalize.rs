//! Normalization applied to every production when a grammar is built
//!
//! Trees built through the [`Term`] constructors are already flat, but
//! deserialized trees are not, so this pass re-establishes the invariants:
//! nested same-kind groups are spliced, empty groups and inverted repeat
//! bounds are rejected, and single control-character literals become named
//! character sets.

use tracing::trace;

use super::term::{check_bounds, flatten};
use super::Term;
use crate::charset::{is_control, name_for, CharClass};
use crate::core::{RailyardError, Result};

pub(crate) fn normalize(term: Term) -> Result<Term> {
    match term {
        Term::Literal { text, case_sensitive } => Ok(rewrite_control_literal(text, case_sensitive)),
        Term::Sequence { children } => {
            let children = normalize_all(flatten(children, |term| match term {
                Term::Sequence { children } => Ok(children),
                other => Err(other),
            }))?;
            if children.is_empty() {
                return Err(RailyardError::structural("a sequence needs at least one child"));
            }
            Ok(Term::Sequence { children })
        }
        Term::Alternatives { children } => {
            let children = normalize_all(flatten(children, |term| match term {
                Term::Alternatives { children } => Ok(children),
                other => Err(other),
            }))?;
            if children.is_empty() {
                return Err(RailyardError::structural(
                    "an alternative set needs at least one child",
                ));
            }
            Ok(Term::Alternatives { children })
        }
        Term::Repeat {
            min,
            max,
            body,
            separator,
        } => {
            check_bounds(min, max)?;
            Ok(Term::Repeat {
                min,
                max,
                body: Box::new(normalize(*body)?),
                separator: separator.map(|s| normalize(*s).map(Box::new)).transpose()?,
            })
        }
        other @ (Term::CharacterSet { .. } | Term::NonTerminal { .. } | Term::Epsilon) => Ok(other),
    }
}

fn normalize_all(children: Vec<Term>) -> Result<Vec<Term>> {
    children.into_iter().map(normalize).collect()
}

/// A literal made of exactly one control character names that character
fn rewrite_control_literal(text: String, case_sensitive: bool) -> Term {
    let mut chars = text.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        let code_point = c as u32;
        if is_control(code_point) {
            if let Some(name) = name_for(code_point) {
                trace!(code_point, name, "Rewrote control literal as named character set");
                return Term::characters(CharClass::named(name));
            }
        }
    }
    Term::Literal { text, case_sensitive }
}
