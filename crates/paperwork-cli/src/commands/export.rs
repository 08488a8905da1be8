use anyhow::{Context, Result};
use paperwork_core::audit::AuditEntry;
use paperwork_core::model::CompositionId;
use paperwork_core::schema::Database;
use paperwork_cwr::{Config, Export, ExportService};
use std::path::{Path, PathBuf};

use super::current_actor;

pub fn run_export(
    db: &Database,
    config: &Config,
    song: &CompositionId,
    out: Option<PathBuf>,
    stdout: bool,
) -> Result<()> {
    let service = ExportService::new(db, config.sender.clone());
    let export = service
        .export(song)
        .with_context(|| format!("Failed to export {song}"))?;

    let destination = if stdout {
        print!("{}", export.content);
        None
    } else {
        let dir = out.unwrap_or_else(|| PathBuf::from("."));
        Some(write_export(&dir, &export)?)
    };

    db.insert_audit_entry(&AuditEntry::new(
        current_actor(),
        "EXPORT_CWR",
        "composition",
        song.to_string(),
        serde_json::json!({
            "filename": export.filename,
            "records": export.lines().count(),
        }),
    ))?;

    if let Some(path) = destination {
        println!("✓ Wrote {}", path.display());
    }

    Ok(())
}

/// Write an export into `dir`, returning the path written.
fn write_export(dir: &Path, export: &Export) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(safe_filename(&export.filename));
    std::fs::write(&path, &export.content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Keep a title-derived filename inside the output directory.
fn safe_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperwork_core::model::{Composition, Share, Writer};
    use tempfile::TempDir;

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("AC/DC_Tribute.V21"), "AC_DC_Tribute.V21");
        assert_eq!(safe_filename("..\\up.V21"), ".._up.V21");
        assert_eq!(safe_filename("Test_Song.V21"), "Test_Song.V21");
    }

    #[test]
    fn test_export_writes_file_and_audits() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open_in_memory().unwrap();
        let song = Composition::new("Test Song");
        db.insert_composition(&song).unwrap();
        db.insert_writer(&Writer::new(song.id, Share::whole()).with_display_name("Jane Doe"))
            .unwrap();

        let config = Config::default();
        run_export(&db, &config, &song.id, Some(temp_dir.path().to_path_buf()), false).unwrap();

        let written = std::fs::read_to_string(temp_dir.path().join("Test_Song.V21")).unwrap();
        assert!(written.starts_with("HDR"));
        assert_eq!(written.split("\r\n").count(), 5);
        assert!(!written.ends_with("\r\n"));

        let audit = db
            .list_audit_entries("composition", &song.id.to_string())
            .unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action, "EXPORT_CWR");
        assert_eq!(audit[0].data["filename"], "Test_Song.V21");
        assert_eq!(audit[0].data["records"], 5);
    }

    #[test]
    fn test_failed_export_is_not_audited() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open_in_memory().unwrap();
        let missing = CompositionId::new();

        let result = run_export(
            &db,
            &Config::default(),
            &missing,
            Some(temp_dir.path().to_path_buf()),
            false,
        );

        assert!(result.is_err());
        assert!(db
            .list_audit_entries("composition", &missing.to_string())
            .unwrap()
            .is_empty());
    }
}
