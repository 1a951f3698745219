//! Bracket-expression parser for character sets
//!
//! Syntax: `[` items `]`, where an item is a single character, a range
//! `c1-c2` whose left operand is the immediately preceding single
//! character, or one of the escapes `\a \b \e \f \n \r \t \v`.

use chumsky::prelude::*;
use tracing::trace;

use super::{CodePointRange, CodePointSet};
use crate::core::{RailyardError, Result};

const ESCAPES: [(char, u32); 8] = [
    ('a', 0x07),
    ('b', 0x08),
    ('e', 0x1B),
    ('f', 0x0C),
    ('n', 0x0A),
    ('r', 0x0D),
    ('t', 0x09),
    ('v', 0x0B),
];

fn unescape(letter: char) -> Option<u32> {
    ESCAPES
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, cp)| *cp)
}

/// Escape letter that stands for `code_point`, if any
pub(super) fn escape_letter(code_point: u32) -> Option<char> {
    ESCAPES
        .iter()
        .find(|(_, cp)| *cp == code_point)
        .map(|(l, _)| *l)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    Single(char),
    Escape(char),
    Dash,
}

fn item_lexer<'src>() -> impl Parser<'src, &'src str, Vec<Item>> {
    let escape = just('\\').ignore_then(any()).map(Item::Escape);
    let dash = just('-').to(Item::Dash);
    let single = any().map(Item::Single);

    choice((escape, dash, single))
        .repeated()
        .collect()
        .then_ignore(end())
}

enum State {
    Start,
    AfterSingle(u32),
    AfterDash(u32),
    AfterRange,
}

pub(super) fn parse_bracket_expression(text: &str) -> Result<CodePointSet> {
    let fail = |message: &str| RailyardError::malformed_charset(text, message);

    let body = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| fail("character set must be enclosed in '[...]'"))?;

    if body.ends_with('-') || body.ends_with('\\') {
        return Err(fail("character set cannot end in '-' or '\\'"));
    }

    let items = item_lexer()
        .parse(body)
        .into_result()
        .map_err(|_| fail("unreadable character set"))?;

    let mut ranges = Vec::with_capacity(items.len());
    let mut state = State::Start;
    for item in items {
        let code_point = match item {
            Item::Dash => {
                state = match state {
                    State::AfterSingle(first) => State::AfterDash(first),
                    State::AfterDash(_) => return Err(fail("'-' may not follow '-'")),
                    State::Start | State::AfterRange => {
                        return Err(fail("'-' must be preceded by single char"))
                    }
                };
                continue;
            }
            Item::Single(c) => c as u32,
            Item::Escape(letter) => unescape(letter).ok_or_else(|| {
                RailyardError::malformed_charset(
                    text,
                    format!("Invalid escape character '\\{}'", letter),
                )
            })?,
        };

        state = match state {
            State::AfterDash(first) => {
                if first > code_point {
                    return Err(RailyardError::malformed_charset(
                        text,
                        format!("Invalid range: {:#X} is above {:#X}", first, code_point),
                    ));
                }
                ranges.push(CodePointRange::new(first, code_point));
                State::AfterRange
            }
            _ => {
                ranges.push(CodePointRange::new(code_point, code_point));
                State::AfterSingle(code_point)
            }
        };
    }

    let set = CodePointSet::from(ranges);
    trace!(input = text, ranges = set.ranges().len(), "Parsed character set");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(text: &str) -> String {
        parse_bracket_expression(text).unwrap_err().to_string()
    }

    #[test]
    fn test_lexer_items() {
        let items = item_lexer().parse("a-\\n").into_result().unwrap();
        assert_eq!(
            items,
            vec![Item::Single('a'), Item::Dash, Item::Escape('n')]
        );
    }

    #[test]
    fn test_parse_singles_and_ranges() {
        let set = parse_bracket_expression("[a-z0-9_]").unwrap();
        let expected = CodePointSet::union([
            &CodePointSet::range('a', 'z'),
            &CodePointSet::range('0', '9'),
            &CodePointSet::single('_'),
        ]);
        assert_eq!(set, expected);
    }

    #[test]
    fn test_parse_escapes() {
        let set = parse_bracket_expression("[\\a\\b\\e\\f\\n\\r\\t\\v]").unwrap();
        for cp in [0x07u32, 0x08, 0x1B, 0x0C, 0x0A, 0x0D, 0x09, 0x0B] {
            assert!(set.contains(char::from_u32(cp).unwrap()), "missing {:#X}", cp);
        }
        assert_eq!(set.len(), 8);
    }

    #[test]
    fn test_parse_escape_as_range_bound() {
        let set = parse_bracket_expression("[\\t-\\r]").unwrap();
        assert_eq!(set, CodePointSet::range('\t', '\r'));
    }

    #[test]
    fn test_parse_empty_brackets() {
        assert!(parse_bracket_expression("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_closing_bracket_inside() {
        let set = parse_bracket_expression("[]]").unwrap();
        assert_eq!(set, CodePointSet::single(']'));
    }

    #[test]
    fn test_unenclosed() {
        for text in ["abc", "[abc", "abc]", "", "["] {
            assert!(
                parse_err(text).contains("must be enclosed in '[...]'"),
                "input {:?}",
                text
            );
        }
    }

    #[test]
    fn test_trailing_dash_or_backslash() {
        assert!(parse_err("[a-]").contains("cannot end in '-' or '\\'"));
        assert!(parse_err("[a\\]").contains("cannot end in '-' or '\\'"));
    }

    #[test]
    fn test_double_dash() {
        assert!(parse_err("[a--z]").contains("'-' may not follow '-'"));
    }

    #[test]
    fn test_leading_dash() {
        assert!(parse_err("[-a]").contains("'-' must be preceded by single char"));
    }

    #[test]
    fn test_dash_after_range() {
        assert!(parse_err("[a-c-e]").contains("'-' must be preceded by single char"));
    }

    #[test]
    fn test_invalid_escape() {
        let message = parse_err("[\\q]");
        assert!(message.contains("Invalid escape character"));
        assert!(message.contains("\\q"));
    }

    #[test]
    fn test_reversed_range() {
        assert!(parse_err("[z-a]").contains("Invalid range"));
    }
}
