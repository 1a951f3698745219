//! Shared text utilities for diagram rendering
//!
//! Text measurement and number formatting used by the drawing backends.

use unicode_width::UnicodeWidthStr;

/// Display width of `text` in terminal columns.
///
/// # Example
/// ```
/// use railyard::core::display_width;
///
/// assert_eq!(display_width("expr"), 4);
/// assert_eq!(display_width("日本"), 4);
/// ```
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Format a coordinate for emitted documents.
///
/// Output never depends on the process locale: the decimal separator is
/// always `.`, at most two fractional digits are kept and trailing zeros are
/// dropped.
///
/// # Example
/// ```
/// use railyard::core::format_number;
///
/// assert_eq!(format_number(12.0), "12");
/// assert_eq!(format_number(1.5), "1.5");
/// assert_eq!(format_number(2.125), "2.13");
/// ```
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 {
        return format!("{}", rounded as i64);
    }
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
