//! Column layouts for every record kind.
//!
//! This table is the single source of truth for field order and width. The
//! record builder writes lines from it and [`field`] reads them back.

use std::fmt;

/// How a field's value is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// Upper-case `[A-Z0-9 ]`, space padded on the right.
    Alpha,
    /// Digits, zero padded on the left.
    Numeric,
    /// Printable ASCII written as given, space padded on the right.
    Verbatim,
    /// A value fixed by the record kind itself.
    Constant(&'static str),
}

/// One fixed-width column of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub width: usize,
    pub format: FieldFormat,
}

impl FieldSpec {
    const fn alpha(name: &'static str, width: usize) -> Self {
        Self {
            name,
            width,
            format: FieldFormat::Alpha,
        }
    }

    const fn numeric(name: &'static str, width: usize) -> Self {
        Self {
            name,
            width,
            format: FieldFormat::Numeric,
        }
    }

    const fn verbatim(name: &'static str, width: usize) -> Self {
        Self {
            name,
            width,
            format: FieldFormat::Verbatim,
        }
    }

    const fn constant(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            width: value.len(),
            format: FieldFormat::Constant(value),
        }
    }

    /// Whether the caller supplies this field's value.
    pub const fn is_supplied(&self) -> bool {
        !matches!(self.format, FieldFormat::Constant(_))
    }
}

/// The five record kinds of a registration file, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Header,
    GroupHeader,
    WorkRegistration,
    Writer,
    Trailer,
}

impl RecordKind {
    pub const ALL: [Self; 5] = [
        Self::Header,
        Self::GroupHeader,
        Self::WorkRegistration,
        Self::Writer,
        Self::Trailer,
    ];

    /// The three-letter tag that opens every line of this kind.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Header => "HDR",
            Self::GroupHeader => "GRH",
            Self::WorkRegistration => "NWR",
            Self::Writer => "SWR",
            Self::Trailer => "TRL",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Identify a record line by its leading tag.
    pub fn of_line(line: &str) -> Option<Self> {
        line.get(..3).and_then(Self::from_tag)
    }

    /// The column layout for this kind.
    pub const fn layout(self) -> &'static [FieldSpec] {
        match self {
            Self::Header => HEADER,
            Self::GroupHeader => GROUP_HEADER,
            Self::WorkRegistration => WORK_REGISTRATION,
            Self::Writer => WRITER,
            Self::Trailer => TRAILER,
        }
    }

    /// Total line width of this kind.
    pub fn width(self) -> usize {
        self.layout().iter().map(|f| f.width).sum()
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Society code written when a writer's society is not tracked.
pub const UNKNOWN_SOCIETY: &str = "000";

/// Role code for a composer/author.
pub const ROLE_COMPOSER_AUTHOR: &str = "CA";

const HEADER: &[FieldSpec] = &[
    FieldSpec::constant("record_type", "HDR"),
    FieldSpec::alpha("sender_type", 2),
    FieldSpec::numeric("sender_id", 9),
    FieldSpec::alpha("sender_name", 45),
    FieldSpec::numeric("creation_date", 8),
    FieldSpec::verbatim("version", 5),
];

const GROUP_HEADER: &[FieldSpec] = &[
    FieldSpec::constant("record_type", "GRH"),
    FieldSpec::alpha("transaction_type", 3),
    FieldSpec::numeric("group_id", 5),
    FieldSpec::verbatim("version", 5),
    FieldSpec::numeric("batch_request", 10),
];

const WORK_REGISTRATION: &[FieldSpec] = &[
    FieldSpec::constant("record_type", "NWR"),
    FieldSpec::numeric("transaction_seq", 8),
    FieldSpec::numeric("record_seq", 8),
    FieldSpec::alpha("title", 60),
    FieldSpec::alpha("language_code", 2),
    FieldSpec::alpha("submitter_work_id", 14),
    FieldSpec::alpha("work_code", 11),
    FieldSpec::constant("filler", "00000000"),
];

const WRITER: &[FieldSpec] = &[
    FieldSpec::constant("record_type", "SWR"),
    FieldSpec::numeric("transaction_seq", 8),
    FieldSpec::numeric("record_seq", 8),
    FieldSpec::numeric("registrant_code", 9),
    FieldSpec::alpha("last_name", 45),
    FieldSpec::alpha("first_name", 30),
    // unknown indicator, designation, tax id, work-for-hire
    FieldSpec::constant("filler", "            "),
    FieldSpec::constant("role_code", ROLE_COMPOSER_AUTHOR),
    FieldSpec::numeric("pr_share", 5),
    FieldSpec::constant("pr_society", UNKNOWN_SOCIETY),
    FieldSpec::numeric("mr_share", 5),
    FieldSpec::constant("mr_society", UNKNOWN_SOCIETY),
    FieldSpec::numeric("sr_share", 5),
    FieldSpec::constant("sr_society", UNKNOWN_SOCIETY),
    FieldSpec::constant("name_number", "           "),
];

const TRAILER: &[FieldSpec] = &[
    FieldSpec::constant("record_type", "TRL"),
    FieldSpec::constant("group_count", "00001"),
    FieldSpec::numeric("transaction_count", 8),
    FieldSpec::numeric("record_count", 8),
];

/// Column offset and width of a named field.
pub fn position(kind: RecordKind, name: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for spec in kind.layout() {
        if spec.name == name {
            return Some((offset, spec.width));
        }
        offset += spec.width;
    }
    None
}

/// Read a named field out of a record line.
///
/// Returns `None` for unknown field names and for lines too short to hold
/// the field.
pub fn field<'a>(kind: RecordKind, line: &'a str, name: &str) -> Option<&'a str> {
    let (offset, width) = position(kind, name)?;
    line.get(offset..offset + width)
}

/// Split a record line into its named fields, in layout order.
///
/// Fields the line is too short to hold are omitted.
pub fn fields(kind: RecordKind, line: &str) -> Vec<(&'static str, &str)> {
    kind.layout()
        .iter()
        .scan(0, |offset, spec| {
            let start = *offset;
            *offset += spec.width;
            Some((spec.name, line.get(start..start + spec.width)))
        })
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
}
