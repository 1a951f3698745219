//! Character-set algebra
//!
//! A [`CodePointSet`] stores Unicode code points as an ascending list of
//! disjoint, maximal inclusive ranges. Every constructor re-merges, so two
//! sets holding the same code points are structurally equal no matter how
//! they were built.
//!
//! ```
//! use railyard::charset::CodePointSet;
//!
//! let parsed = CodePointSet::parse("[a-z0-9]").unwrap();
//! let built = CodePointSet::union([
//!     &CodePointSet::range('0', '9'),
//!     &CodePointSet::range('a', 'z'),
//! ]);
//! assert_eq!(parsed, built);
//! ```

mod names;
mod parse;

pub use names::*;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::Result;

/// Largest Unicode scalar value
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// An inclusive range of code points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CodePointRange {
    pub first: u32,
    pub last: u32,
}

impl CodePointRange {
    pub fn new(first: u32, last: u32) -> Self {
        Self {
            first: first.min(last).min(MAX_CODE_POINT),
            last: first.max(last).min(MAX_CODE_POINT),
        }
    }

    pub fn len(&self) -> u32 {
        self.last - self.first + 1
    }

    pub fn contains(&self, code_point: u32) -> bool {
        self.first <= code_point && code_point <= self.last
    }
}

/// A canonical set of Unicode code points
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<CodePointRange>", into = "Vec<CodePointRange>")]
pub struct CodePointSet {
    ranges: Vec<CodePointRange>,
}

impl CodePointSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(code_point: char) -> Self {
        Self::range(code_point, code_point)
    }

    /// All code points from `first` to `last` inclusive
    ///
    /// Bounds given in descending order are swapped.
    pub fn range(first: char, last: char) -> Self {
        Self::from_code_point_range(first as u32, last as u32)
    }

    pub fn code_points(code_points: impl IntoIterator<Item = char>) -> Self {
        Self::from_ranges(
            code_points
                .into_iter()
                .map(|c| CodePointRange::new(c as u32, c as u32))
                .collect(),
        )
    }

    pub fn union<'a>(sets: impl IntoIterator<Item = &'a CodePointSet>) -> Self {
        Self::from_ranges(
            sets.into_iter()
                .flat_map(|set| set.ranges.iter().copied())
                .collect(),
        )
    }

    /// Parse a bracket expression such as `[a-z_\t]`
    pub fn parse(text: &str) -> Result<Self> {
        parse::parse_bracket_expression(text)
    }

    pub(crate) fn from_code_point_range(first: u32, last: u32) -> Self {
        Self::from_ranges(vec![CodePointRange::new(first, last)])
    }

    fn from_ranges(mut ranges: Vec<CodePointRange>) -> Self {
        ranges.sort_unstable();
        let mut merged: Vec<CodePointRange> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(previous) if range.first <= previous.last.saturating_add(1) => {
                    previous.last = previous.last.max(range.last);
                }
                _ => merged.push(range),
            }
        }
        Self { ranges: merged }
    }

    pub fn union_with(&self, other: &CodePointSet) -> Self {
        Self::union([self, other])
    }

    /// Code points of `self` that are not in `other`
    pub fn except(&self, other: &CodePointSet) -> Self {
        let mut remaining = Vec::with_capacity(self.ranges.len());
        for range in &self.ranges {
            let mut first = range.first;
            let last = range.last;
            let overlapping = other
                .ranges
                .iter()
                .filter(|c| c.last >= range.first && c.first <= range.last);
            for cut in overlapping {
                if cut.last < first {
                    continue;
                }
                if cut.first > first {
                    remaining.push(CodePointRange::new(first, cut.first - 1));
                }
                if cut.last >= last {
                    first = last.saturating_add(1);
                    break;
                }
                first = cut.last + 1;
            }
            if first <= last {
                remaining.push(CodePointRange::new(first, last));
            }
        }
        Self::from_ranges(remaining)
    }

    pub fn contains(&self, code_point: char) -> bool {
        let cp = code_point as u32;
        self.ranges
            .binary_search_by(|range| {
                if range.last < cp {
                    std::cmp::Ordering::Less
                } else if range.first > cp {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of code points in the set
    pub fn len(&self) -> u32 {
        self.ranges.iter().map(CodePointRange::len).sum()
    }

    pub fn ranges(&self) -> &[CodePointRange] {
        &self.ranges
    }

    /// The only member, when the set holds exactly one code point
    pub fn single_code_point(&self) -> Option<u32> {
        match self.ranges.as_slice() {
            [range] if range.first == range.last => Some(range.first),
            _ => None,
        }
    }
}

impl From<Vec<CodePointRange>> for CodePointSet {
    fn from(ranges: Vec<CodePointRange>) -> Self {
        let ranges = ranges
            .into_iter()
            .map(|r| CodePointRange::new(r.first, r.last))
            .collect();
        Self::from_ranges(ranges)
    }
}

impl From<CodePointSet> for Vec<CodePointRange> {
    fn from(set: CodePointSet) -> Self {
        set.ranges
    }
}

/// Writes one code point as bracket text
///
/// [`CodePointSet::parse`] reads the output back for printable code points
/// other than `-` and `\`, and for controls with a letter escape. The
/// bracket syntax has no way to write `-`, `\` or other controls, so those
/// are printed for reading only.
fn write_code_point(f: &mut fmt::Formatter<'_>, code_point: u32) -> fmt::Result {
    if let Some(escape) = parse::escape_letter(code_point) {
        return write!(f, "\\{}", escape);
    }
    match char::from_u32(code_point) {
        Some(c) if !c.is_control() => write!(f, "{}", c),
        _ => write!(f, "\\u{{{:X}}}", code_point),
    }
}

impl fmt::Display for CodePointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for range in &self.ranges {
            write_code_point(f, range.first)?;
            if range.last > range.first {
                if range.last > range.first + 1 {
                    write!(f, "-")?;
                }
                write_code_point(f, range.last)?;
            }
        }
        write!(f, "]")
    }
}

/// A character class as written in a grammar: a name or an explicit set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    /// A named class such as `LF`, resolved through [`code_point_for`]
    /// when the name is known and kept opaque otherwise
    Named(String),
    Set(CodePointSet),
}

impl CharClass {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Text used for this class in diagrams
    pub fn label(&self) -> String {
        match self {
            CharClass::Named(name) => name.clone(),
            CharClass::Set(set) => set.to_string(),
        }
    }

    /// Resolve to concrete code points, when possible
    pub fn code_points(&self) -> Option<CodePointSet> {
        match self {
            CharClass::Named(name) => {
                code_point_for(name).map(|cp| CodePointSet::from_code_point_range(cp, cp))
            }
            CharClass::Set(set) => Some(set.clone()),
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(set: &CodePointSet) -> Vec<(u32, u32)> {
        set.ranges().iter().map(|r| (r.first, r.last)).collect()
    }

    #[test]
    fn test_single_and_range() {
        assert_eq!(ranges(&CodePointSet::single('a')), vec![(0x61, 0x61)]);
        assert_eq!(ranges(&CodePointSet::range('a', 'c')), vec![(0x61, 0x63)]);
        assert_eq!(CodePointSet::range('c', 'a'), CodePointSet::range('a', 'c'));
    }

    #[test]
    fn test_adjacent_ranges_merge() {
        let set = CodePointSet::union([&CodePointSet::range('a', 'f'), &CodePointSet::range('g', 'k')]);
        assert_eq!(ranges(&set), vec![(0x61, 0x6B)]);
    }

    #[test]
    fn test_overlapping_ranges_merge() {
        let set = CodePointSet::union([
            &CodePointSet::range('m', 'z'),
            &CodePointSet::range('a', 'p'),
            &CodePointSet::single('b'),
        ]);
        assert_eq!(ranges(&set), vec![(0x61, 0x7A)]);
    }

    #[test]
    fn test_code_points_merge() {
        let set = CodePointSet::code_points("cbadx".chars());
        assert_eq!(ranges(&set), vec![(0x61, 0x64), (0x78, 0x78)]);
    }

    #[test]
    fn test_except_splits_ranges() {
        let letters = CodePointSet::range('a', 'z');
        let vowels = CodePointSet::code_points("aeiou".chars());
        let consonants = letters.except(&vowels);
        assert!(!consonants.contains('a'));
        assert!(consonants.contains('b'));
        assert!(!consonants.contains('u'));
        assert!(consonants.contains('z'));
        assert_eq!(consonants.len(), 21);
        assert_eq!(consonants.ranges().len(), 5);
    }

    #[test]
    fn test_except_everything() {
        let set = CodePointSet::range('a', 'z');
        assert!(set.except(&CodePointSet::range(' ', '~')).is_empty());
        assert_eq!(set.except(&CodePointSet::empty()), set);
    }

    #[test]
    fn test_except_upper_bound() {
        let all = CodePointSet::from_code_point_range(0, MAX_CODE_POINT);
        let rest = all.except(&CodePointSet::single(char::MAX));
        assert_eq!(ranges(&rest), vec![(0, MAX_CODE_POINT - 1)]);
    }

    #[test]
    fn test_contains() {
        let set = CodePointSet::parse("[a-c x]").unwrap();
        assert!(set.contains('b'));
        assert!(set.contains(' '));
        assert!(set.contains('x'));
        assert!(!set.contains('d'));
    }

    #[test]
    fn test_single_code_point() {
        assert_eq!(CodePointSet::single('q').single_code_point(), Some('q' as u32));
        assert_eq!(CodePointSet::range('a', 'b').single_code_point(), None);
        assert_eq!(CodePointSet::empty().single_code_point(), None);
    }

    #[test]
    fn test_display_is_canonical() {
        let set = CodePointSet::union([
            &CodePointSet::range('0', '9'),
            &CodePointSet::code_points("ab".chars()),
            &CodePointSet::single('\n'),
        ]);
        assert_eq!(set.to_string(), "[\\n0-9ab]");
        assert_eq!(CodePointSet::parse(&set.to_string()).unwrap(), set);
    }

    #[test]
    fn test_display_unescapable_control() {
        assert_eq!(CodePointSet::single('\u{1}').to_string(), "[\\u{1}]");
    }

    #[test]
    fn test_display_of_inexpressible_code_points() {
        assert_eq!(CodePointSet::single('-').to_string(), "[-]");
        assert_eq!(CodePointSet::code_points("+,-".chars()).to_string(), "[+--]");
        for set in [
            CodePointSet::single('-'),
            CodePointSet::single('\\'),
            CodePointSet::single('\u{1}'),
        ] {
            assert!(CodePointSet::parse(&set.to_string()).is_err(), "{set}");
        }
    }

    #[test]
    fn test_serde_recanonicalizes() {
        let set: CodePointSet =
            serde_json::from_str(r#"[{"first":100,"last":102},{"first":97,"last":99}]"#).unwrap();
        assert_eq!(ranges(&set), vec![(97, 102)]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"[{"first":97,"last":102}]"#);
    }

    #[test]
    fn test_char_class_label() {
        assert_eq!(CharClass::named("LF").label(), "LF");
        assert_eq!(CharClass::Set(CodePointSet::range('a', 'z')).label(), "[a-z]");
    }

    #[test]
    fn test_char_class_code_points() {
        let lf = CharClass::named("LF").code_points().unwrap();
        assert_eq!(lf.single_code_point(), Some(0x0A));
        assert_eq!(CharClass::named("Letter").code_points(), None);
    }
}
