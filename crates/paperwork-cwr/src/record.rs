use crate::encode::{encode_digits, encode_number, encode_text, encode_verbatim};
use crate::layout::{FieldFormat, FieldSpec, RecordKind};

/// A raw value for one supplied field of a record.
///
/// Values are encoded according to the column they land in, so an absent
/// value becomes blanks or zeros rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Number(Option<i64>),
    /// A formatted identifier whose digits form a number (`"00-123-4567"`).
    Digits(Option<&'a str>),
}

impl FieldValue<'_> {
    /// An absent value.
    pub const BLANK: FieldValue<'static> = FieldValue::Text(None);

    #[must_use]
    pub fn text(value: &str) -> FieldValue<'_> {
        FieldValue::Text(Some(value))
    }

    #[must_use]
    pub fn number(value: i64) -> FieldValue<'static> {
        FieldValue::Number(Some(value))
    }

    fn encode(self, spec: &FieldSpec) -> String {
        match (spec.format, self) {
            (FieldFormat::Constant(value), _) => value.to_string(),
            (FieldFormat::Numeric, Self::Number(n)) => encode_number(n, spec.width),
            (FieldFormat::Numeric, Self::Text(s) | Self::Digits(s)) => {
                encode_digits(s, spec.width)
            }
            (FieldFormat::Alpha, Self::Text(s) | Self::Digits(s)) => encode_text(s, spec.width),
            (FieldFormat::Alpha, Self::Number(n)) => {
                encode_text(n.map(|n| n.to_string()).as_deref(), spec.width)
            }
            (FieldFormat::Verbatim, Self::Text(s) | Self::Digits(s)) => {
                encode_verbatim(s, spec.width)
            }
            (FieldFormat::Verbatim, Self::Number(n)) => {
                encode_verbatim(n.map(|n| n.to_string()).as_deref(), spec.width)
            }
        }
    }
}

/// One line of a registration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    pub kind: RecordKind,
    pub line: String,
}

impl ExportRecord {
    /// Read a named field back out of this record.
    pub fn field(&self, name: &str) -> Option<&str> {
        crate::layout::field(self.kind, &self.line, name)
    }
}

/// Build one record line from the values of its supplied fields.
///
/// `values` fills the non-constant columns of `kind`'s layout in order;
/// constant columns (the record tag, role code, society placeholders,
/// fillers) are written by the layout itself. Missing trailing values are
/// encoded as blanks or zeros; surplus values are ignored.
pub fn build_record(kind: RecordKind, values: &[FieldValue<'_>]) -> ExportRecord {
    let layout = kind.layout();
    let mut supplied = values.iter().copied();
    let mut line = String::with_capacity(kind.width());
    for spec in layout {
        let value = if spec.is_supplied() {
            supplied.next().unwrap_or(FieldValue::BLANK)
        } else {
            FieldValue::BLANK
        };
        line.push_str(&value.encode(spec));
    }

    ExportRecord { kind, line }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailer_line() {
        let record = build_record(
            RecordKind::Trailer,
            &[FieldValue::number(1), FieldValue::number(3)],
        );
        assert_eq!(record.line, "TRL000010000000100000003");
        assert_eq!(record.field("record_count"), Some("00000003"));
    }

    #[test]
    fn test_short_value_list_fills_zeros() {
        let record = build_record(RecordKind::Trailer, &[FieldValue::number(1)]);
        assert_eq!(record.line, "TRL000010000000100000000");
    }

    #[test]
    fn test_empty_value_list_fills_blanks() {
        let record = build_record(RecordKind::WorkRegistration, &[]);
        assert_eq!(record.line.len(), RecordKind::WorkRegistration.width());
        assert_eq!(record.field("title"), Some(" ".repeat(60).as_str()));
        assert_eq!(record.field("transaction_seq"), Some("00000000"));
    }

    #[test]
    fn test_surplus_values_are_ignored() {
        let record = build_record(
            RecordKind::Trailer,
            &[
                FieldValue::number(1),
                FieldValue::number(3),
                FieldValue::number(99),
            ],
        );
        assert_eq!(record.line, "TRL000010000000100000003");
    }

    #[test]
    fn test_group_header_line() {
        let record = build_record(
            RecordKind::GroupHeader,
            &[
                FieldValue::text("NWR"),
                FieldValue::number(1),
                FieldValue::text("02.10"),
                FieldValue::number(0),
            ],
        );
        assert_eq!(record.line, "GRHNWR0000102.100000000000");
    }

    #[test]
    fn test_every_line_has_layout_width() {
        for kind in RecordKind::ALL {
            let supplied = kind.layout().iter().filter(|s| s.is_supplied()).count();
            let values = vec![FieldValue::text("x"); supplied];
            let record = build_record(kind, &values);
            assert_eq!(record.line.len(), kind.width(), "{kind}");
            assert!(record.line.starts_with(kind.tag()));
        }
    }

    #[test]
    fn test_writer_constants_are_written_by_layout() {
        let record = build_record(
            RecordKind::Writer,
            &[
                FieldValue::number(1),
                FieldValue::number(1),
                FieldValue::Digits(Some("123-456-789")),
                FieldValue::text("Jane Doe"),
                FieldValue::BLANK,
                FieldValue::number(5000),
                FieldValue::number(5000),
                FieldValue::number(5000),
            ],
        );
        assert_eq!(record.field("role_code"), Some("CA"));
        assert_eq!(record.field("registrant_code"), Some("123456789"));
        assert_eq!(record.field("filler"), Some("            "));
        assert_eq!(record.field("pr_society"), Some("000"));
        assert_eq!(record.field("sr_share"), Some("05000"));
        assert_eq!(record.field("name_number"), Some("           "));
    }

    #[test]
    fn test_mismatched_values_still_encode_cleanly() {
        let numeric_title = FieldValue::Number(Some(1999)).encode(&crate::layout::FieldSpec {
            name: "title",
            width: 6,
            format: FieldFormat::Alpha,
        });
        assert_eq!(numeric_title, "1999  ");
    }
}
