use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// An ownership percentage, kept as the decimal text it was entered as.
///
/// Floating point cannot represent most two-decimal percentages exactly
/// (`33.33 * 100` is `3332.99...`), so the value is stored and truncated as
/// decimal text. Stored values are never rejected on read: text that is not
/// a decimal number counts as zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Share(String);

impl Share {
    /// Wrap a value read back from the store without validating it.
    #[must_use]
    pub fn from_stored(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Build a share from a floating point percentage.
    ///
    /// Uses the shortest decimal representation of `value`, so `33.33`
    /// stays `33.33`. Non-finite values become zero.
    #[must_use]
    pub fn from_percent(value: f64) -> Self {
        if value.is_finite() {
            Self(value.to_string())
        } else {
            Self(String::from("0"))
        }
    }

    /// The full 100% share.
    #[must_use]
    pub fn whole() -> Self {
        Self(String::from("100"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The share in hundredths of a percent, truncated toward zero.
    ///
    /// `37.25` is `3725`, `100` is `10000`, `12.349` is `1234`. Malformed
    /// text yields `0`.
    pub fn hundredths(&self) -> i64 {
        parse_hundredths(&self.0).unwrap_or(0)
    }

    /// The share as a floating point percentage, for totals and display.
    ///
    /// Only plain decimal text is read; anything else (including `NaN` and
    /// `inf`) counts as zero, matching `hundredths()`.
    pub fn percent(&self) -> f64 {
        if parse_hundredths(&self.0).is_none() {
            return 0.0;
        }
        self.0.trim().parse().unwrap_or(0.0)
    }

    /// Whether the share lies in the inclusive range `[0, 100]`.
    pub fn is_in_range(&self) -> bool {
        parse_hundredths(&self.0).is_some_and(|h| (0..=10_000).contains(&h))
    }
}

impl FromStr for Share {
    type Err = Error;

    /// Parse user input, accepting only plain decimal numbers.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if parse_hundredths(trimmed).is_none() {
            return Err(Error::InvalidShare(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

fn parse_hundredths(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let cents = fraction.bytes().chain(std::iter::repeat(b'0')).take(2);
    let value = whole
        .bytes()
        .chain(cents)
        .fold(0_i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });

    Some(if negative { -value } else { value })
}
