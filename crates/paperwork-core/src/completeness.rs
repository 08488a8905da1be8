//! Registration completeness checks.
//!
//! An export never refuses incomplete data: missing fields are encoded as
//! blanks or zeros. These checks are how callers find out what is missing
//! before a file is submitted.

use std::fmt;

use crate::model::{Composition, WorkCode, Writer, WriterId};

/// Tolerance when comparing the share total against 100%.
const SHARE_TOTAL_TOLERANCE: f64 = 0.001;

/// A piece of registration data that is missing or unusable.
#[derive(Debug, Clone, PartialEq)]
pub enum MissingItem {
    /// The composition has no work code.
    WorkCode,

    /// The stored work code is not `T` followed by ten digits.
    MalformedWorkCode(String),

    /// Nobody is credited on the composition.
    Writers,

    /// A writer has no name to register under.
    WriterName { writer: WriterId },

    /// A writer has no registrant code, so royalties cannot be routed.
    RegistrantCode { writer: WriterId, name: Option<String> },

    /// A writer's share lies outside `[0, 100]`.
    ShareOutOfRange { writer: WriterId, share: String },

    /// The shares do not add up to 100%.
    ShareTotal { total: f64 },
}

impl fmt::Display for MissingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WorkCode => write!(f, "work code (ISWC) not registered"),
            Self::MalformedWorkCode(code) => write!(f, "work code {code:?} is malformed"),
            Self::Writers => write!(f, "no writers credited"),
            Self::WriterName { writer } => write!(f, "writer {writer} has no name"),
            Self::RegistrantCode { writer, name } => match name {
                Some(name) => write!(f, "writer {name} has no registrant (IPI) code"),
                None => write!(f, "writer {writer} has no registrant (IPI) code"),
            },
            Self::ShareOutOfRange { writer, share } => {
                write!(f, "writer {writer} has share {share} outside 0-100%")
            }
            Self::ShareTotal { total } => write!(f, "shares total {total:.2}%, not 100%"),
        }
    }
}

/// List everything a registration of `composition` would be missing.
///
/// An empty result means the composition is ready to register.
pub fn check(composition: &Composition, writers: &[Writer]) -> Vec<MissingItem> {
    let mut missing = Vec::new();

    match composition.work_code.as_deref().map(str::trim) {
        None | Some("") => missing.push(MissingItem::WorkCode),
        Some(code) if !WorkCode::is_valid(code) => {
            missing.push(MissingItem::MalformedWorkCode(code.to_string()));
        }
        Some(_) => {}
    }

    if writers.is_empty() {
        missing.push(MissingItem::Writers);
        return missing;
    }

    for writer in writers {
        let name = writer
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        if name.is_none() {
            missing.push(MissingItem::WriterName { writer: writer.id });
        }

        let has_code = writer
            .registrant_code
            .as_deref()
            .is_some_and(|c| c.chars().any(|ch| ch.is_ascii_digit()));
        if !has_code {
            missing.push(MissingItem::RegistrantCode {
                writer: writer.id,
                name: name.map(str::to_string),
            });
        }

        if !writer.ownership_share.is_in_range() {
            missing.push(MissingItem::ShareOutOfRange {
                writer: writer.id,
                share: writer.ownership_share.as_str().to_string(),
            });
        }
    }

    let total: f64 = writers.iter().map(|w| w.ownership_share.percent()).sum();
    if (total - 100.0).abs() >= SHARE_TOTAL_TOLERANCE {
        missing.push(MissingItem::ShareTotal { total });
    }

    missing
}
