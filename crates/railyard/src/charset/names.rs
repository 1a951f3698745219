//! Named code points
//!
//! Control characters cannot be drawn as literal text, so grammars and
//! diagrams refer to them by their ASCII mnemonic.

/// Canonical names, indexed by code point, for 0x00 through 0x20
const CONTROL_NAMES: [&str; 0x21] = [
    "NUL", "SOH", "STX", "ETX", "EOT", "ENQ", "ACK", "BEL", "BS", "HT", "LF", "VT", "FF", "CR",
    "SO", "SI", "DLE", "DC1", "DC2", "DC3", "DC4", "NAK", "SYN", "ETB", "CAN", "EM", "SUB", "ESC",
    "FS", "GS", "RS", "US", "SP",
];

const DELETE: (u32, &str) = (0x7F, "DEL");

/// Alternative spellings accepted on lookup
const ALIASES: &[(&str, u32)] = &[
    ("NULL", 0x00),
    ("BELL", 0x07),
    ("BACKSPACE", 0x08),
    ("TAB", 0x09),
    ("NL", 0x0A),
    ("NEWLINE", 0x0A),
    ("NEW_LINE", 0x0A),
    ("FORMFEED", 0x0C),
    ("RETURN", 0x0D),
    ("ESCAPE", 0x1B),
    ("SPACE", 0x20),
    ("DELETE", 0x7F),
];

/// Look up the code point a class name stands for
///
/// Matching is case-insensitive and accepts the aliases above.
///
/// # Example
/// ```
/// use railyard::charset::code_point_for;
///
/// assert_eq!(code_point_for("LF"), Some(0x0A));
/// assert_eq!(code_point_for("tab"), Some(0x09));
/// assert_eq!(code_point_for("Letter"), None);
/// ```
pub fn code_point_for(name: &str) -> Option<u32> {
    let upper = name.to_ascii_uppercase();
    if let Some(cp) = CONTROL_NAMES.iter().position(|n| *n == upper) {
        return Some(cp as u32);
    }
    if upper == DELETE.1 {
        return Some(DELETE.0);
    }
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == upper)
        .map(|(_, cp)| *cp)
}

/// Canonical name of a code point, if it has one
pub fn name_for(code_point: u32) -> Option<&'static str> {
    match code_point {
        cp if (cp as usize) < CONTROL_NAMES.len() => Some(CONTROL_NAMES[cp as usize]),
        cp if cp == DELETE.0 => Some(DELETE.1),
        _ => None,
    }
}

/// True for code points that a literal cannot display (below 0x20)
pub fn is_control(code_point: u32) -> bool {
    code_point < 0x20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_named_code_point_round_trips() {
        for cp in (0x00..=0x20).chain(std::iter::once(0x7F)) {
            let name = name_for(cp).unwrap();
            assert_eq!(code_point_for(name), Some(cp), "round trip of {}", name);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(code_point_for("NEWLINE"), Some(0x0A));
        assert_eq!(code_point_for("space"), Some(0x20));
        assert_eq!(code_point_for("Delete"), Some(0x7F));
    }

    #[test]
    fn test_unnamed_code_points() {
        assert_eq!(name_for('a' as u32), None);
        assert_eq!(name_for(0x80), None);
        assert_eq!(code_point_for(""), None);
    }

    #[test]
    fn test_is_control() {
        assert!(is_control(0x00));
        assert!(is_control(0x1F));
        assert!(!is_control(0x20));
        assert!(!is_control('a' as u32));
    }
}
