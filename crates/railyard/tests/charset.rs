//! Character-set parsing and named control classes

use proptest::prelude::*;
use railyard::charset::{code_point_for, name_for, CharClass, CodePointSet};
use railyard::grammar::{GrammarBuilder, Term};
use railyard::RailyardError;

#[test]
fn test_parse_matches_union() {
    let parsed = CodePointSet::parse("[a-z0-9]").unwrap();
    let union = CodePointSet::union([
        &CodePointSet::range('a', 'z'),
        &CodePointSet::range('0', '9'),
    ]);
    assert_eq!(parsed, union);
}

#[test]
fn test_error_messages() {
    let cases = [
        ("a-z", "must be enclosed in '[...]'"),
        ("[a-]", "cannot end in '-' or '\\'"),
        ("[a\\]", "cannot end in '-' or '\\'"),
        ("[a--b]", "'-' may not follow '-'"),
        ("[-a]", "'-' must be preceded by single char"),
        ("[\\q]", "Invalid escape character"),
    ];
    for (input, expected) in cases {
        match CodePointSet::parse(input) {
            Err(RailyardError::MalformedCharacterSet { message, .. }) => {
                assert!(message.contains(expected), "{input}: {message}");
            }
            other => panic!("{input}: expected a malformed set, got {other:?}"),
        }
    }
}

#[test]
fn test_control_names_round_trip() {
    for code_point in 0..=0x20u32 {
        let name = name_for(code_point).unwrap_or_else(|| panic!("no name for {code_point:#x}"));
        assert_eq!(code_point_for(name), Some(code_point));
    }
}

#[test]
fn test_control_literals_normalize_to_named_sets() {
    for code_point in 0..0x20u32 {
        let literal = char::from_u32(code_point).unwrap().to_string();
        let grammar = GrammarBuilder::new("test")
            .production("c", Term::literal(literal))
            .build()
            .unwrap();
        let Some(Term::CharacterSet { class, exceptions }) = grammar.production("c") else {
            panic!("{code_point:#x} was not rewritten");
        };
        assert!(exceptions.is_empty());
        assert!(matches!(class, CharClass::Named(_)));
        let set = class.code_points().unwrap();
        assert_eq!(set.single_code_point(), Some(code_point));
    }
}

#[derive(Debug, Clone)]
enum Item {
    Single(char),
    Range(char, char),
}

impl Item {
    fn text(&self) -> String {
        match self {
            Item::Single(c) => c.to_string(),
            Item::Range(a, b) => format!("{a}-{b}"),
        }
    }

    fn set(&self) -> CodePointSet {
        match self {
            Item::Single(c) => CodePointSet::single(*c),
            Item::Range(a, b) => CodePointSet::range(*a, *b),
        }
    }
}

fn plain_char() -> impl Strategy<Value = char> {
    prop::char::range('0', 'z').prop_filter("no syntax characters", |c| !matches!(c, '-' | '\\' | '[' | ']'))
}

fn item() -> impl Strategy<Value = Item> {
    prop_oneof![
        plain_char().prop_map(Item::Single),
        (plain_char(), plain_char()).prop_map(|(a, b)| Item::Range(a.min(b), a.max(b))),
    ]
}

proptest! {
    #[test]
    fn prop_parse_is_order_and_duplicate_independent(
        items in prop::collection::vec(item(), 1..8),
        seed in any::<u64>(),
    ) {
        let mut shuffled = items.clone();
        let len = shuffled.len();
        shuffled.rotate_left((seed as usize) % len);
        shuffled.push(items[0].clone());

        let text = |items: &[Item]| format!("[{}]", items.iter().map(Item::text).collect::<String>());
        let parsed = CodePointSet::parse(&text(&items)).unwrap();
        let reordered = CodePointSet::parse(&text(&shuffled)).unwrap();
        let sets: Vec<CodePointSet> = items.iter().map(Item::set).collect();

        prop_assert_eq!(&parsed, &reordered);
        prop_assert_eq!(&parsed, &CodePointSet::union(&sets));
    }

    #[test]
    fn prop_display_reparses(items in prop::collection::vec(item(), 1..8)) {
        let sets: Vec<CodePointSet> = items.iter().map(Item::set).collect();
        let set = CodePointSet::union(&sets);
        prop_assert_eq!(CodePointSet::parse(&set.to_string()).unwrap(), set);
    }
}
