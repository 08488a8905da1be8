//! Integration tests for the on-disk catalog store.

use paperwork_core::audit::AuditEntry;
use paperwork_core::completeness::{self, MissingItem};
use paperwork_core::model::{Composition, Profile, Share, Writer};
use paperwork_core::schema::{Database, MIGRATIONS};
use tempfile::TempDir;

/// Reopening a database keeps its data and does not re-run migrations.
#[test]
fn test_reopen_preserves_data() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let song = Composition::new("Test Song").with_work_code("T1234567893");
    {
        let db = Database::open(&db_path).expect("Failed to open database");
        db.insert_composition(&song).unwrap();
    }

    let db = Database::open(&db_path).expect("Failed to reopen database");
    let loaded = db.get_composition(&song.id).unwrap().unwrap();
    assert_eq!(loaded.title, "Test Song");
    assert_eq!(loaded.work_code.as_deref(), Some("T1234567893"));

    let applied: i64 = db
        .conn()
        .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
        .unwrap();
    assert_eq!(applied, i64::try_from(MIGRATIONS.len()).unwrap());
}

/// Deleting a composition removes its writer credits too.
#[test]
fn test_delete_cascades_to_writers() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(temp_dir.path().join("test.db")).unwrap();

    let song = Composition::new("Short Lived");
    db.insert_composition(&song).unwrap();
    let writer = Writer::new(song.id, Share::whole()).with_display_name("Jane Doe");
    db.insert_writer(&writer).unwrap();

    db.delete_composition(&song.id).unwrap();

    assert!(db.list_writers_for_composition(&song.id).unwrap().is_empty());
    assert!(db.load_export_source(&song.id).unwrap().is_none());
}

/// A profile edit shows up in every credit that links to it.
#[test]
fn test_profile_details_resolve_through_credits() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(temp_dir.path().join("test.db")).unwrap();

    let profile = Profile::new("Jane Doe").with_registrant_code("00-123-4567");
    db.insert_profile(&profile).unwrap();
    let song = Composition::new("Linked").with_work_code("T1234567893");
    let credit = Writer::new(song.id, Share::whole())
        .with_profile(profile.id)
        .with_display_name("J. Doe (old)");
    db.insert_composition_with_writer(&song, &credit).unwrap();

    let source = db.load_export_source(&song.id).unwrap().unwrap();
    assert_eq!(source.writers.len(), 1);
    assert_eq!(source.writers[0].display_name.as_deref(), Some("Jane Doe"));
    assert_eq!(
        source.writers[0].registrant_code.as_deref(),
        Some("00-123-4567")
    );
    assert!(completeness::check(&source.composition, &source.writers).is_empty());
}

/// Incomplete songs are reported, not rejected, by the store.
#[test]
fn test_incomplete_song_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(temp_dir.path().join("test.db")).unwrap();

    let song = Composition::new("Half Done");
    db.insert_composition(&song).unwrap();
    db.insert_writer(&Writer::new(song.id, Share::from_stored("60")).with_display_name("A"))
        .unwrap();

    let source = db.load_export_source(&song.id).unwrap().unwrap();
    let missing = completeness::check(&source.composition, &source.writers);

    assert!(missing.contains(&MissingItem::WorkCode));
    assert!(missing
        .iter()
        .any(|item| matches!(item, MissingItem::ShareTotal { .. })));
}

/// Audit entries are kept per entity, newest first.
#[test]
fn test_audit_log_history() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(temp_dir.path().join("test.db")).unwrap();
    let song = Composition::new("Audited");
    db.insert_composition(&song).unwrap();

    for action in ["CREATE_SONG", "EXPORT_CWR"] {
        db.insert_audit_entry(&AuditEntry::new(
            "tester",
            action,
            "composition",
            song.id.to_string(),
            serde_json::json!({ "title": song.title }),
        ))
        .unwrap();
    }

    let entries = db
        .list_audit_entries("composition", &song.id.to_string())
        .unwrap();
    let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["EXPORT_CWR", "CREATE_SONG"]);
    assert_eq!(entries[0].data["title"], "Audited");
}
