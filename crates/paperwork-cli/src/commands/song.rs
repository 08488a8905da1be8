use anyhow::{bail, Context, Result};
use paperwork_core::audit::AuditEntry;
use paperwork_core::completeness;
use paperwork_core::ingest;
use paperwork_core::model::{Composition, CompositionId, ProfileId, Share, WorkCode, Writer};
use paperwork_core::schema::Database;
use std::path::Path;

use super::current_actor;

/// Normalize a work code typed by the user.
///
/// An empty string means "no work code".
fn normalize_work_code(input: Option<String>) -> Result<Option<String>> {
    match input.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => {
            let parsed = WorkCode::parse(code)
                .with_context(|| format!("Invalid work code: {code}"))?;
            Ok(Some(parsed.as_str().to_string()))
        }
    }
}

pub fn add_song(
    db: &Database,
    title: String,
    work_code: Option<String>,
    writer: Option<ProfileId>,
) -> Result<()> {
    if title.trim().is_empty() {
        bail!("Song title cannot be empty");
    }

    let mut song = Composition::new(title.trim());
    song.work_code = normalize_work_code(work_code)?;

    match writer {
        Some(profile_id) => {
            let profile = db
                .get_profile(&profile_id)?
                .with_context(|| format!("Profile not found: {profile_id}"))?;
            let credit = Writer::new(song.id, Share::whole()).with_profile(profile.id);
            db.insert_composition_with_writer(&song, &credit)?;
            println!("✓ Added {} ({}) with {} at 100%", song.title, song.id, profile.name);
        }
        None => {
            db.insert_composition(&song)?;
            println!("✓ Added {} ({})", song.title, song.id);
        }
    }

    db.insert_audit_entry(&AuditEntry::new(
        current_actor(),
        "CREATE_SONG",
        "composition",
        song.id.to_string(),
        serde_json::json!({ "title": song.title, "work_code": song.work_code }),
    ))?;

    Ok(())
}

pub fn list_songs(db: &Database) -> Result<()> {
    let songs = db.list_compositions()?;

    if songs.is_empty() {
        println!("No songs yet. Run `paperwork song add <title>` to add one.");
        return Ok(());
    }

    for song in &songs {
        let code = song
            .work_code
            .as_deref()
            .map_or_else(|| String::from("-"), display_work_code);
        println!("{}  {:<16}  {}", song.id, code, song.title);
    }
    println!("\n{} song(s)", songs.len());

    Ok(())
}

pub fn show_song(db: &Database, id: &CompositionId) -> Result<()> {
    let source = db
        .load_export_source(id)?
        .with_context(|| format!("Song not found: {id}"))?;
    let song = &source.composition;

    println!("\n🎵 {}\n", song.title);
    println!("  Id:        {}", song.id);
    println!(
        "  Work code: {}",
        song.work_code
            .as_deref()
            .map_or_else(|| String::from("<not registered>"), display_work_code)
    );
    println!("  Added:     {}", song.created_at.format("%Y-%m-%d"));

    if source.writers.is_empty() {
        println!("\n  No writers credited.");
    } else {
        println!("\n  Writers:");
        for writer in &source.writers {
            println!(
                "    {}  {:<30} {:>8}  {:?}  IPI {}",
                writer.id,
                writer.display_name.as_deref().unwrap_or("<unnamed>"),
                writer.ownership_share.to_string(),
                writer.role,
                writer.registrant_code.as_deref().unwrap_or("-"),
            );
        }
    }

    let missing = completeness::check(song, &source.writers);
    if missing.is_empty() {
        println!("\n  ✓ Ready to register");
    } else {
        println!("\n  Missing:");
        for item in &missing {
            println!("    - {item}");
        }
    }

    Ok(())
}

pub fn update_song(
    db: &Database,
    id: &CompositionId,
    title: Option<String>,
    work_code: Option<String>,
) -> Result<()> {
    if title.is_none() && work_code.is_none() {
        bail!("Nothing to update: pass --title and/or --work-code");
    }

    let mut song = db
        .get_composition(id)?
        .with_context(|| format!("Song not found: {id}"))?;
    let old_data = serde_json::json!({ "title": song.title, "work_code": song.work_code });

    if let Some(title) = title {
        if title.trim().is_empty() {
            bail!("Song title cannot be empty");
        }
        song.title = title.trim().to_string();
    }
    if work_code.is_some() {
        song.work_code = normalize_work_code(work_code)?;
    }
    song.updated_at = chrono::Utc::now();

    db.update_composition(&song)?;
    db.insert_audit_entry(&AuditEntry::new(
        current_actor(),
        "UPDATE_SONG",
        "composition",
        song.id.to_string(),
        serde_json::json!({
            "old": old_data,
            "new": { "title": song.title, "work_code": song.work_code },
        }),
    ))?;

    println!("✓ Updated {}", song.title);
    Ok(())
}

pub fn delete_song(db: &Database, id: &CompositionId) -> Result<()> {
    db.delete_composition(id)
        .with_context(|| format!("Failed to delete song {id}"))?;
    db.insert_audit_entry(&AuditEntry::new(
        current_actor(),
        "DELETE_SONG",
        "composition",
        id.to_string(),
        serde_json::Value::Null,
    ))?;

    println!("✓ Deleted {id}");
    Ok(())
}

pub fn import_songs(db: &Database, file: &Path, writer: Option<&ProfileId>) -> Result<()> {
    let profile = match writer {
        Some(id) => Some(
            db.get_profile(id)?
                .with_context(|| format!("Profile not found: {id}"))?,
        ),
        None => None,
    };

    let reader = std::fs::File::open(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;
    let rows = ingest::read_rows(reader)
        .with_context(|| format!("Failed to read CSV {}", file.display()))?;
    if rows.is_empty() {
        bail!(
            "No rows with a title found in {}; expected one of the columns: {}",
            file.display(),
            ingest::TITLE_COLUMNS.join(", ")
        );
    }

    let summary = ingest::import_rows(db, &rows, profile.as_ref());

    db.insert_audit_entry(&AuditEntry::new(
        current_actor(),
        "IMPORT_CSV",
        "catalog",
        file.display().to_string(),
        serde_json::json!({
            "rows": rows.len(),
            "created": summary.created,
            "matched": summary.matched,
            "work_codes_added": summary.work_codes_added,
            "invalid_work_codes": summary.invalid_work_codes,
            "errors": summary.errors,
            "writer": profile.as_ref().map(|p| p.id.to_string()),
        }),
    ))?;

    println!("✓ Imported {} of {} row(s)", summary.imported(), rows.len());
    println!("  Created:          {}", summary.created);
    println!("  Already present:  {}", summary.matched);
    println!("  Work codes added: {}", summary.work_codes_added);
    if summary.invalid_work_codes > 0 {
        println!("  Ignored invalid work codes: {}", summary.invalid_work_codes);
    }
    if summary.errors > 0 {
        println!("  ⚠ {} row(s) failed; see the log for details", summary.errors);
    }

    Ok(())
}

/// Dashed form of a stored work code, or the raw text if it is malformed.
fn display_work_code(code: &str) -> String {
    WorkCode::parse(code).map_or_else(|_| code.to_string(), |parsed| parsed.display())
}
