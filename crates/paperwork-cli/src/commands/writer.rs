use anyhow::{bail, Context, Result};
use paperwork_core::audit::AuditEntry;
use paperwork_core::model::{CompositionId, ProfileId, Share, Writer, WriterId, WriterRole};
use paperwork_core::schema::Database;

use super::current_actor;

/// Creative roles accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RoleArg {
    Composer,
    Lyricist,
    ComposerLyricist,
    Arranger,
}

impl From<RoleArg> for WriterRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Composer => Self::Composer,
            RoleArg::Lyricist => Self::Lyricist,
            RoleArg::ComposerLyricist => Self::ComposerLyricist,
            RoleArg::Arranger => Self::Arranger,
        }
    }
}

/// A writer credit as given on the command line.
#[derive(Debug)]
pub struct NewCredit {
    pub song: CompositionId,
    pub share: Share,
    pub profile: Option<ProfileId>,
    pub name: Option<String>,
    pub registrant_code: Option<String>,
    pub role: RoleArg,
}

pub fn add_writer(db: &Database, credit: NewCredit) -> Result<()> {
    if !credit.share.is_in_range() {
        bail!("Share must be between 0 and 100, got {}", credit.share);
    }

    let song = db
        .get_composition(&credit.song)?
        .with_context(|| format!("Song not found: {}", credit.song))?;

    let mut writer = Writer::new(song.id, credit.share).with_role(credit.role.into());

    let label = match (credit.profile, credit.name) {
        (Some(profile_id), _) => {
            let profile = db
                .get_profile(&profile_id)?
                .with_context(|| format!("Profile not found: {profile_id}"))?;
            writer = writer.with_profile(profile.id);
            profile.name
        }
        (None, Some(name)) if !name.trim().is_empty() => {
            writer = writer.with_display_name(name.trim());
            name.trim().to_string()
        }
        (None, _) => bail!("Pass either --profile or --name"),
    };
    if let Some(code) = credit
        .registrant_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
    {
        writer = writer.with_registrant_code(code);
    }

    db.insert_writer(&writer)?;
    db.insert_audit_entry(&AuditEntry::new(
        current_actor(),
        "ADD_WRITER",
        "composition",
        song.id.to_string(),
        serde_json::json!({
            "writer": writer.id.to_string(),
            "share": writer.ownership_share.as_str(),
        }),
    ))?;

    println!(
        "✓ Credited {} on {} at {} ({})",
        label, song.title, writer.ownership_share, writer.id
    );

    let total: f64 = db
        .list_writers_for_composition(&song.id)?
        .iter()
        .map(|w| w.ownership_share.percent())
        .sum();
    if (total - 100.0).abs() > 0.001 {
        println!("  Shares on this song now total {total:.2}%");
    }

    Ok(())
}

pub fn remove_writer(db: &Database, id: &WriterId) -> Result<()> {
    db.delete_writer(id)
        .with_context(|| format!("Failed to remove writer {id}"))?;
    println!("✓ Removed writer {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperwork_core::model::Composition;

    fn credit(song: CompositionId, share: &str) -> NewCredit {
        NewCredit {
            song,
            share: share.parse().unwrap(),
            profile: None,
            name: Some(String::from("Jane Doe")),
            registrant_code: Some(String::from("00-123-4567")),
            role: RoleArg::Lyricist,
        }
    }

    #[test]
    fn test_add_writer_by_name() {
        let db = Database::open_in_memory().unwrap();
        let song = Composition::new("Test Song");
        db.insert_composition(&song).unwrap();

        add_writer(&db, credit(song.id, "50")).unwrap();

        let writers = db.list_writers_for_composition(&song.id).unwrap();
        assert_eq!(writers.len(), 1);
        assert_eq!(writers[0].display_name.as_deref(), Some("Jane Doe"));
        assert_eq!(writers[0].registrant_code.as_deref(), Some("00-123-4567"));
        assert_eq!(writers[0].role, WriterRole::Lyricist);
    }

    #[test]
    fn test_add_writer_rejects_out_of_range_share() {
        let db = Database::open_in_memory().unwrap();
        let song = Composition::new("Test Song");
        db.insert_composition(&song).unwrap();

        assert!(add_writer(&db, credit(song.id, "150")).is_err());
        assert!(db.list_writers_for_composition(&song.id).unwrap().is_empty());
    }

    #[test]
    fn test_add_writer_requires_a_name_or_profile() {
        let db = Database::open_in_memory().unwrap();
        let song = Composition::new("Test Song");
        db.insert_composition(&song).unwrap();

        let mut anonymous = credit(song.id, "100");
        anonymous.name = None;
        assert!(add_writer(&db, anonymous).is_err());
    }

    #[test]
    fn test_add_writer_to_unknown_song() {
        let db = Database::open_in_memory().unwrap();
        assert!(add_writer(&db, credit(CompositionId::new(), "100")).is_err());
    }
}
