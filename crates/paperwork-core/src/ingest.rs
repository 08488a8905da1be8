//! Bulk catalog import from distributor and society CSV exports.
//!
//! Each row is matched against the store by work code first, then by title.
//! Unmatched rows become new compositions, optionally crediting one profile
//! as sole writer. Matched compositions without a work code pick up the
//! row's code.

use std::io;

use crate::error::Result;
use crate::model::{Composition, CompositionId, Profile, Share, WorkCode, Writer};
use crate::schema::Database;

/// Column headers that may carry the title, in order of preference.
pub const TITLE_COLUMNS: &[&str] = &["Title", "Track Title", "Work Title", "Song Name"];

/// Column headers that may carry the work code (ISWC), in order of preference.
pub const WORK_CODE_COLUMNS: &[&str] = &["ISWC", "ISWC Code"];

/// One usable row of a catalog CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    /// 1-based line number of the row in the source file.
    pub line: u64,
    pub title: String,
    /// The work code exactly as it appears in the file.
    pub work_code: Option<String>,
}

/// Read catalog rows from CSV with a header line.
///
/// Rows with no title in any of [`TITLE_COLUMNS`] are skipped. Columns are
/// matched by exact header name; other columns are ignored.
pub fn read_rows<R: io::Read>(reader: R) -> Result<Vec<CatalogRow>> {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    let title_columns = column_indices(&headers, TITLE_COLUMNS);
    let code_columns = column_indices(&headers, WORK_CODE_COLUMNS);

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let Some(title) = first_value(&record, &title_columns) else {
            log::debug!("Skipping CSV line {line}: no title");
            continue;
        };
        rows.push(CatalogRow {
            line,
            title: title.to_string(),
            work_code: first_value(&record, &code_columns).map(str::to_string),
        });
    }

    Ok(rows)
}

fn column_indices(headers: &csv::StringRecord, names: &[&str]) -> Vec<usize> {
    names
        .iter()
        .filter_map(|name| headers.iter().position(|header| header == *name))
        .collect()
}

fn first_value<'r>(record: &'r csv::StringRecord, columns: &[usize]) -> Option<&'r str> {
    columns
        .iter()
        .filter_map(|&idx| record.get(idx))
        .find(|value| !value.is_empty())
}

/// What happened to one imported row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Created(CompositionId),
    Matched(CompositionId),
    /// Matched an existing composition and filled in its missing work code.
    WorkCodeAdded(CompositionId),
}

/// Totals for one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub matched: usize,
    pub work_codes_added: usize,
    /// Rows whose work code could not be normalized and was ignored.
    pub invalid_work_codes: usize,
    /// Rows that failed to store.
    pub errors: usize,
}

impl ImportSummary {
    /// Rows imported without error.
    pub fn imported(&self) -> usize {
        self.created + self.matched + self.work_codes_added
    }
}

/// Import catalog rows into the store.
///
/// With `writer`, matching by title only considers compositions crediting
/// that profile, and new compositions credit it at 100% as composer. A row
/// that fails to store is logged and counted; the rest still import.
pub fn import_rows(db: &Database, rows: &[CatalogRow], writer: Option<&Profile>) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for row in rows {
        let work_code = match row.work_code.as_deref().map(WorkCode::parse) {
            Some(Ok(code)) => Some(code),
            Some(Err(e)) => {
                log::warn!("Line {}: ignoring work code for {}: {e}", row.line, row.title);
                summary.invalid_work_codes += 1;
                None
            }
            None => None,
        };

        match import_row(db, &row.title, work_code.as_ref(), writer) {
            Ok(ImportOutcome::Created(_)) => summary.created += 1,
            Ok(ImportOutcome::Matched(_)) => summary.matched += 1,
            Ok(ImportOutcome::WorkCodeAdded(_)) => summary.work_codes_added += 1,
            Err(e) => {
                log::warn!("Line {}: failed to import {}: {e}", row.line, row.title);
                summary.errors += 1;
            }
        }
    }

    log::info!(
        "Imported {} row(s): {} created, {} matched, {} work code(s) added, {} error(s)",
        summary.imported(),
        summary.created,
        summary.matched,
        summary.work_codes_added,
        summary.errors
    );

    summary
}

/// Find or create the composition for one row.
pub fn import_row(
    db: &Database,
    title: &str,
    work_code: Option<&WorkCode>,
    writer: Option<&Profile>,
) -> Result<ImportOutcome> {
    let title = title.trim();

    let existing = match work_code {
        Some(code) => db.find_composition_by_work_code(code.as_str())?,
        None => None,
    };
    let existing = match existing {
        Some(composition) => Some(composition),
        None => db.find_composition_by_title(title, writer.map(|p| &p.id))?,
    };

    match (existing, work_code) {
        (Some(mut composition), Some(code)) if composition.work_code.is_none() => {
            composition.work_code = Some(code.as_str().to_string());
            composition.updated_at = chrono::Utc::now();
            db.update_composition(&composition)?;
            Ok(ImportOutcome::WorkCodeAdded(composition.id))
        }
        (Some(composition), _) => Ok(ImportOutcome::Matched(composition.id)),
        (None, code) => {
            let mut composition = Composition::new(title);
            composition.work_code = code.map(|c| c.as_str().to_string());
            match writer {
                Some(profile) => {
                    let credit =
                        Writer::new(composition.id, Share::whole()).with_profile(profile.id);
                    db.insert_composition_with_writer(&composition, &credit)?;
                }
                None => db.insert_composition(&composition)?,
            }
            Ok(ImportOutcome::Created(composition.id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WriterRole;

    fn rows(csv: &str) -> Vec<CatalogRow> {
        read_rows(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_read_rows_uses_first_non_empty_title_column() {
        let parsed = rows(
            "Song Name,Track Title,ISWC,ISRC\n\
             Fallback,Preferred,T-123.456.789-3,USRC17607839\n\
             Only Song Name,,,\n\
             ,,T-000.000.000-1,\n",
        );

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, "Preferred");
        assert_eq!(parsed[0].work_code.as_deref(), Some("T-123.456.789-3"));
        assert_eq!(parsed[1].title, "Only Song Name");
        assert_eq!(parsed[1].work_code, None);
    }

    #[test]
    fn test_read_rows_handles_quoted_commas() {
        let parsed = rows("Title,ISWC Code\n\"Hello, Goodbye\",T1234567893\n");
        assert_eq!(parsed[0].title, "Hello, Goodbye");
        assert_eq!(parsed[0].work_code.as_deref(), Some("T1234567893"));
    }

    #[test]
    fn test_new_song_credits_importer() {
        let db = Database::open_in_memory().unwrap();
        let profile = Profile::new("Jane Doe");
        db.insert_profile(&profile).unwrap();

        let summary = import_rows(&db, &rows("Title,ISWC\nNew One,t-123.456.789-3\n"), Some(&profile));

        assert_eq!(summary.created, 1);
        let songs = db.list_compositions().unwrap();
        assert_eq!(songs[0].work_code.as_deref(), Some("T1234567893"));
        let writers = db.list_writers_for_composition(&songs[0].id).unwrap();
        assert_eq!(writers.len(), 1);
        assert_eq!(writers[0].profile_id, Some(profile.id));
        assert_eq!(writers[0].ownership_share, Share::whole());
        assert_eq!(writers[0].role, WriterRole::Composer);
    }

    #[test]
    fn test_match_by_work_code_wins_over_title() {
        let db = Database::open_in_memory().unwrap();
        let song = Composition::new("Registered Name").with_work_code("T1234567893");
        db.insert_composition(&song).unwrap();

        let summary = import_rows(
            &db,
            &rows("Work Title,ISWC\nDistributor Spelling,T-123.456.789-3\n"),
            None,
        );

        assert_eq!(summary.matched, 1);
        assert_eq!(summary.created, 0);
        assert_eq!(db.list_compositions().unwrap().len(), 1);
    }

    #[test]
    fn test_title_fallback_matches_existing_song() {
        let db = Database::open_in_memory().unwrap();
        let song = Composition::new("Yesterday");
        db.insert_composition(&song).unwrap();

        let summary = import_rows(&db, &rows("Title\nYesterday\n"), None);

        assert_eq!(summary.matched, 1);
        assert_eq!(db.list_compositions().unwrap().len(), 1);
    }

    #[test]
    fn test_title_match_fills_missing_work_code() {
        let db = Database::open_in_memory().unwrap();
        let song = Composition::new("Yesterday");
        db.insert_composition(&song).unwrap();

        let summary = import_rows(&db, &rows("Title,ISWC\nYesterday,T-123.456.789-3\n"), None);

        assert_eq!(summary.work_codes_added, 1);
        let stored = db.get_composition(&song.id).unwrap().unwrap();
        assert_eq!(stored.work_code.as_deref(), Some("T1234567893"));
    }

    #[test]
    fn test_existing_work_code_is_not_overwritten() {
        let db = Database::open_in_memory().unwrap();
        let song = Composition::new("Yesterday").with_work_code("T0000000001");
        db.insert_composition(&song).unwrap();

        let summary = import_rows(&db, &rows("Title,ISWC\nYesterday,T1234567893\n"), None);

        assert_eq!(summary.matched, 1);
        let stored = db.get_composition(&song.id).unwrap().unwrap();
        assert_eq!(stored.work_code.as_deref(), Some("T0000000001"));
    }

    #[test]
    fn test_title_match_is_scoped_to_importer() {
        let db = Database::open_in_memory().unwrap();
        let profile = Profile::new("Jane Doe");
        db.insert_profile(&profile).unwrap();
        db.insert_composition(&Composition::new("Yesterday")).unwrap();

        let summary = import_rows(&db, &rows("Title\nYesterday\n"), Some(&profile));

        assert_eq!(summary.created, 1);
        assert_eq!(db.list_compositions().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_work_code_is_ignored_not_fatal() {
        let db = Database::open_in_memory().unwrap();

        let summary = import_rows(&db, &rows("Title,ISWC\nOdd One,12345\n"), None);

        assert_eq!(summary.invalid_work_codes, 1);
        assert_eq!(summary.created, 1);
        let songs = db.list_compositions().unwrap();
        assert_eq!(songs[0].work_code, None);
    }
}
