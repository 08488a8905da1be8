//! Fixed-width field encoding.
//!
//! Every function here is total: whatever the input, the result is exactly
//! `width` characters long and drawn from the field's character set.

/// Encode free text as an upper-case alphanumeric field.
///
/// The value is upper-cased, every character outside `[A-Z0-9 ]` is
/// dropped, and the result is space padded on the right or cut down to its
/// leftmost `width` characters. `None` yields an all-space field.
pub fn encode_text(value: Option<&str>, width: usize) -> String {
    let cleaned: String = value
        .unwrap_or_default()
        .chars()
        .flat_map(char::to_uppercase)
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == ' ')
        .take(width)
        .collect();
    format!("{cleaned:<width$}")
}

/// Encode an integer as a zero-padded numeric field.
///
/// `None` counts as zero and negative values are encoded by magnitude.
/// A value wider than `width` keeps its leftmost `width` digits, so callers
/// must keep values within range themselves.
pub fn encode_number(value: Option<i64>, width: usize) -> String {
    let digits = value.unwrap_or(0).unsigned_abs().to_string();
    encode_digits(Some(&digits), width)
}

/// Encode the digits of a formatted identifier as a numeric field.
///
/// Non-digit characters (dashes, spaces, dots) are dropped and the
/// remaining digits are read as a number, so leading zeros carry no weight:
/// `"00-123-4567"` encodes to width 9 as `"001234567"`. Truncation follows
/// [`encode_number`].
pub fn encode_digits(value: Option<&str>, width: usize) -> String {
    let digits: String = value
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .skip_while(|c| *c == '0')
        .collect();
    let digits = if digits.is_empty() { "0" } else { digits.as_str() };
    let padded = format!("{digits:0>width$}");
    padded[..width].to_string()
}

/// Encode a code that is written as-is, such as a version token (`02.10`).
///
/// Only printable ASCII survives; the value is space padded on the right or
/// cut down to its leftmost `width` characters.
pub fn encode_verbatim(value: Option<&str>, width: usize) -> String {
    let cleaned: String = value
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(width)
        .collect();
    format!("{cleaned:<width$}")
}
