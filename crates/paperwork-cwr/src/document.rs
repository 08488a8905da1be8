use chrono::{DateTime, Utc};
use paperwork_core::model::{Composition, Writer};

use crate::config::SenderIdentity;
use crate::error::{ExportError, ExportResult};
use crate::layout::RecordKind;
use crate::record::{build_record, ExportRecord, FieldValue};

/// Separator between record lines. Receiving systems split on CRLF.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Last name written for a writer with no name on file.
pub const UNKNOWN_WRITER: &str = "UNKNOWN";

/// Every file carries a single transaction: one composition.
const TRANSACTION_SEQ: i64 = 1;

/// A generated registration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Suggested file name, e.g. `Test_Song.V21`.
    pub filename: String,
    pub content: String,
}

impl Export {
    /// The record lines of the file, in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split(LINE_TERMINATOR)
    }
}

/// Build the records of a registration file for one composition.
///
/// Writers are written in the order given, numbered from 1. The trailer
/// counts the work record plus one record per writer.
pub fn assemble_records(
    sender: &SenderIdentity,
    composition: &Composition,
    writers: &[Writer],
    generated_at: DateTime<Utc>,
) -> ExportResult<Vec<ExportRecord>> {
    if !composition.has_title() {
        return Err(ExportError::MissingTitle {
            id: composition.id.to_string(),
        });
    }

    let mut records = Vec::with_capacity(writers.len() + 4);
    records.push(header(sender, generated_at));
    records.push(group_header(sender));
    records.push(work_registration(sender, composition));

    for (index, writer) in writers.iter().enumerate() {
        records.push(writer_record(index + 1, writer));
    }

    records.push(trailer(1 + writers.len()));

    Ok(records)
}

/// Generate the complete registration file for one composition.
///
/// Deterministic: the same inputs and `generated_at` always produce the
/// same bytes.
pub fn assemble_export(
    sender: &SenderIdentity,
    composition: &Composition,
    writers: &[Writer],
    generated_at: DateTime<Utc>,
) -> ExportResult<Export> {
    let records = assemble_records(sender, composition, writers, generated_at)?;

    let content = records
        .iter()
        .map(|record| record.line.as_str())
        .collect::<Vec<_>>()
        .join(LINE_TERMINATOR);

    log::debug!(
        "Assembled {} records for composition {}",
        records.len(),
        composition.id
    );

    Ok(Export {
        filename: filename_for(&composition.title, &sender.file_extension),
        content,
    })
}

/// Suggested file name: the title with whitespace replaced by underscores,
/// plus the format extension.
pub fn filename_for(title: &str, extension: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{stem}.{extension}")
}

fn header(sender: &SenderIdentity, generated_at: DateTime<Utc>) -> ExportRecord {
    let sender_id = sender.sender_id.to_string();
    let date = generated_at.format("%Y%m%d").to_string();
    build_record(
        RecordKind::Header,
        &[
            FieldValue::text(&sender.sender_type),
            FieldValue::Digits(Some(&sender_id)),
            FieldValue::text(&sender.sender_name),
            FieldValue::Digits(Some(&date)),
            FieldValue::text(&sender.header_version),
        ],
    )
}

fn group_header(sender: &SenderIdentity) -> ExportRecord {
    let batch_request = sender.batch_request.to_string();
    build_record(
        RecordKind::GroupHeader,
        &[
            FieldValue::text(&sender.transaction_type),
            FieldValue::number(i64::from(sender.group_id)),
            FieldValue::text(&sender.format_version),
            FieldValue::Digits(Some(&batch_request)),
        ],
    )
}

fn work_registration(sender: &SenderIdentity, composition: &Composition) -> ExportRecord {
    if composition.work_code.is_none() {
        log::debug!(
            "Composition {} has no work code; leaving it blank",
            composition.id
        );
    }

    let submitter_work_id = composition.id.to_string();
    build_record(
        RecordKind::WorkRegistration,
        &[
            FieldValue::number(TRANSACTION_SEQ),
            FieldValue::number(0),
            FieldValue::text(&composition.title),
            FieldValue::text(&sender.language_code),
            FieldValue::text(&submitter_work_id),
            FieldValue::Text(composition.work_code.as_deref()),
        ],
    )
}

fn writer_record(sequence: usize, writer: &Writer) -> ExportRecord {
    let name = writer
        .display_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(UNKNOWN_WRITER);

    if writer.registrant_code.is_none() {
        log::debug!("Writer {} has no registrant code; writing zeros", writer.id);
    }

    let share = FieldValue::number(writer.ownership_share.hundredths());
    build_record(
        RecordKind::Writer,
        &[
            FieldValue::number(TRANSACTION_SEQ),
            FieldValue::number(i64::try_from(sequence).unwrap_or(i64::MAX)),
            FieldValue::Digits(writer.registrant_code.as_deref()),
            FieldValue::text(name),
            FieldValue::BLANK,
            share,
            share,
            share,
        ],
    )
}

fn trailer(record_count: usize) -> ExportRecord {
    build_record(
        RecordKind::Trailer,
        &[
            FieldValue::number(TRANSACTION_SEQ),
            FieldValue::number(i64::try_from(record_count).unwrap_or(i64::MAX)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use paperwork_core::model::{CompositionId, Share};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 30, 0).unwrap()
    }

    fn export(composition: &Composition, writers: &[Writer]) -> Export {
        assemble_export(&SenderIdentity::default(), composition, writers, fixed_time()).unwrap()
    }

    fn writer(
        composition: &Composition,
        name: Option<&str>,
        code: Option<&str>,
        share: &str,
    ) -> Writer {
        let mut writer = Writer::new(composition.id, Share::from_stored(share));
        writer.display_name = name.map(str::to_string);
        writer.registrant_code = code.map(str::to_string);
        writer
    }

    #[test]
    fn test_header_line() {
        let song = Composition::new("Yesterday");
        let export = export(&song, &[]);
        let header = export.lines().next().unwrap();

        assert_eq!(
            header,
            format!("HDRPB000000000{:<45}2026101700.00", "PAPERWORK SYSTEM")
        );
    }

    #[test]
    fn test_minimal_composition() {
        let song = Composition::new("Yesterday");
        let export = export(&song, &[]);
        let lines: Vec<&str> = export.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("HDR"));
        assert_eq!(lines[1], "GRHNWR0000102.100000000000");
        assert!(lines[2].starts_with("NWR0000000100000000YESTERDAY "));
        assert_eq!(
            crate::layout::field(RecordKind::WorkRegistration, lines[2], "work_code"),
            Some("           ")
        );
        assert_eq!(lines[3], "TRL000010000000100000001");
    }

    #[test]
    fn test_one_full_writer() {
        let song = Composition::new("Test Song").with_work_code("T1234567893");
        let writers = vec![writer(&song, Some("Jane Doe"), Some("00-123-4567"), "100")];
        let export = export(&song, &writers);
        let lines: Vec<&str> = export.lines().collect();

        assert_eq!(lines.len(), 5);
        let swr = lines[3];
        assert_eq!(swr.len(), RecordKind::Writer.width());
        assert_eq!(&swr[..19], "SWR0000000100000001");
        assert_eq!(
            crate::layout::field(RecordKind::Writer, swr, "registrant_code"),
            Some("001234567")
        );
        assert_eq!(
            crate::layout::field(RecordKind::Writer, swr, "last_name"),
            Some(format!("{:<45}", "JANE DOE").as_str())
        );
        assert_eq!(&swr[115..141], "CA100000001000000010000000");
        assert!(swr.ends_with(&" ".repeat(11)));
        assert_eq!(lines[4], "TRL000010000000100000002");
    }

    #[test]
    fn test_work_registration_fields() {
        let id: CompositionId = "0f8fad5b-d9cb-469f-a165-70867728950e".parse().unwrap();
        let song = Composition::new("Test Song")
            .with_id(id)
            .with_work_code("T1234567893");
        let records =
            assemble_records(&SenderIdentity::default(), &song, &[], fixed_time()).unwrap();
        let nwr = &records[2];

        assert_eq!(nwr.kind, RecordKind::WorkRegistration);
        assert_eq!(nwr.field("language_code"), Some("EN"));
        assert_eq!(nwr.field("submitter_work_id"), Some("0F8FAD5BD9CB46"));
        assert_eq!(nwr.field("work_code"), Some("T1234567893"));
        assert_eq!(nwr.field("filler"), Some("00000000"));
    }

    #[test]
    fn test_share_truncated_to_hundredths() {
        let song = Composition::new("Split");
        let writers = vec![
            writer(&song, Some("A"), None, "37.25"),
            writer(&song, Some("B"), None, "62.759"),
        ];
        let records =
            assemble_records(&SenderIdentity::default(), &song, &writers, fixed_time()).unwrap();

        assert_eq!(records[3].field("pr_share"), Some("03725"));
        assert_eq!(records[3].field("mr_share"), Some("03725"));
        assert_eq!(records[4].field("sr_share"), Some("06275"));
    }

    #[test]
    fn test_writer_sequence_follows_input_order() {
        let song = Composition::new("Band Song");
        let writers: Vec<Writer> = ["Zed", "Amy", "Moe", "Kim"]
            .iter()
            .map(|name| writer(&song, Some(*name), None, "25"))
            .collect();
        let records =
            assemble_records(&SenderIdentity::default(), &song, &writers, fixed_time()).unwrap();

        let swrs: Vec<&ExportRecord> = records
            .iter()
            .filter(|r| r.kind == RecordKind::Writer)
            .collect();
        let sequences: Vec<&str> = swrs.iter().filter_map(|r| r.field("record_seq")).collect();
        assert_eq!(sequences, vec!["00000001", "00000002", "00000003", "00000004"]);
        assert!(swrs[0].field("last_name").unwrap().starts_with("ZED "));
        assert!(swrs[3].field("last_name").unwrap().starts_with("KIM "));
        assert_eq!(records.last().unwrap().field("record_count"), Some("00000005"));
    }

    #[test]
    fn test_missing_writer_details_degrade() {
        let song = Composition::new("Draft");
        let writers = vec![
            writer(&song, None, None, "-10"),
            writer(&song, Some("   "), Some("pending"), "abc"),
        ];
        let records =
            assemble_records(&SenderIdentity::default(), &song, &writers, fixed_time()).unwrap();

        for swr in &records[3..5] {
            assert_eq!(swr.field("last_name").map(str::trim_end), Some("UNKNOWN"));
            assert_eq!(swr.field("registrant_code"), Some("000000000"));
            assert_eq!(swr.field("first_name"), Some(" ".repeat(30).as_str()));
        }
        assert_eq!(records[3].field("pr_share"), Some("01000"));
        assert_eq!(records[4].field("pr_share"), Some("00000"));
    }

    #[test]
    fn test_long_title_truncated() {
        let title = "A".repeat(30) + &"B".repeat(60);
        let song = Composition::new(title.clone());
        let records =
            assemble_records(&SenderIdentity::default(), &song, &[], fixed_time()).unwrap();

        assert_eq!(records[2].field("title"), Some(&title[..60]));
        assert_eq!(records[2].line.len(), RecordKind::WorkRegistration.width());
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let song = Composition::new("  ");
        let err =
            assemble_export(&SenderIdentity::default(), &song, &[], fixed_time()).unwrap_err();
        assert!(matches!(err, ExportError::MissingTitle { .. }));
        assert!(err.is_precondition());
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let song = Composition::new("Again").with_work_code("T0000000001");
        let writers = vec![writer(&song, Some("Jane"), Some("123"), "100")];
        assert_eq!(export(&song, &writers), export(&song, &writers));
    }

    #[test]
    fn test_lines_joined_with_crlf_without_trailing_terminator() {
        let song = Composition::new("Yesterday");
        let export = export(&song, &[]);
        assert_eq!(export.content.matches("\r\n").count(), 3);
        assert!(!export.content.ends_with("\r\n"));
        assert!(!export.content.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_custom_sender_identity() {
        let sender = SenderIdentity {
            sender_type: "PB".to_string(),
            sender_id: 123_456_789,
            sender_name: "Indie Music, LLC".to_string(),
            file_extension: "V22".to_string(),
            ..SenderIdentity::default()
        };
        let song = Composition::new("Custom");
        let export = assemble_export(&sender, &song, &[], fixed_time()).unwrap();
        let header = export.lines().next().unwrap();

        assert_eq!(
            crate::layout::field(RecordKind::Header, header, "sender_id"),
            Some("123456789")
        );
        assert_eq!(
            crate::layout::field(RecordKind::Header, header, "sender_name").map(str::trim_end),
            Some("INDIE MUSIC LLC")
        );
        assert_eq!(export.filename, "Custom.V22");
    }

    #[test]
    fn test_filename_replaces_whitespace() {
        assert_eq!(filename_for("Test Song", "V21"), "Test_Song.V21");
        assert_eq!(filename_for("Tab\tand  Double", "V21"), "Tab_and__Double.V21");
        assert_eq!(filename_for("Don't Stop!", "V21"), "Don't_Stop!.V21");
    }
}
