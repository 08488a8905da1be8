use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A normalized standardized work code: `T` followed by ten digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkCode(String);

impl WorkCode {
    /// Number of characters in a normalized work code.
    pub const LEN: usize = 11;

    /// Normalize and validate user input.
    ///
    /// Accepts the display form (`T-123.456.789-3`), the compact form
    /// (`T1234567893`) or the ten bare digits (`1234567893`). Case,
    /// punctuation and whitespace are ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let mut cleaned: String = input
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if cleaned.len() == 10 && cleaned.bytes().all(|b| b.is_ascii_digit()) {
            cleaned.insert(0, 'T');
        }

        if Self::is_valid(&cleaned) {
            Ok(Self(cleaned))
        } else {
            Err(Error::InvalidWorkCode(input.to_string()))
        }
    }

    /// Whether `code` is already in normalized form.
    pub fn is_valid(code: &str) -> bool {
        code.len() == Self::LEN
            && code.starts_with('T')
            && code.bytes().skip(1).all(|b| b.is_ascii_digit())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render as `T-DDD.DDD.DDD-D`.
    #[must_use]
    pub fn display(&self) -> String {
        let c = &self.0;
        format!(
            "{}-{}.{}.{}-{}",
            &c[0..1],
            &c[1..4],
            &c[4..7],
            &c[7..10],
            &c[10..11]
        )
    }
}

impl FromStr for WorkCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WorkCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<WorkCode> for String {
    fn from(code: WorkCode) -> Self {
        code.0
    }
}

impl fmt::Display for WorkCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
