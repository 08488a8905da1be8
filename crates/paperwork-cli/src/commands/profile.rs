use anyhow::{bail, Context, Result};
use paperwork_core::audit::AuditEntry;
use paperwork_core::model::{Profile, ProfileId};
use paperwork_core::schema::Database;

use super::current_actor;

pub fn add_profile(db: &Database, name: String, registrant_code: Option<String>) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Profile name cannot be empty");
    }

    let mut profile = Profile::new(name.trim());
    profile.registrant_code = registrant_code
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty());

    db.insert_profile(&profile)?;
    db.insert_audit_entry(&AuditEntry::new(
        current_actor(),
        "CREATE_PROFILE",
        "profile",
        profile.id.to_string(),
        serde_json::json!({ "name": profile.name }),
    ))?;

    println!("✓ Added profile {} ({})", profile.name, profile.id);
    if profile.registrant_code.is_none() {
        println!("  No registrant code set; exports will carry zeros for this writer.");
    }

    Ok(())
}

pub fn show_profile(db: &Database, id: &ProfileId) -> Result<()> {
    let profile = db
        .get_profile(id)?
        .with_context(|| format!("Profile not found: {id}"))?;

    println!("\n👤 {}\n", profile.name);
    println!("  Id:              {}", profile.id);
    println!(
        "  Registrant code: {}",
        profile.registrant_code.as_deref().unwrap_or("<not set>")
    );
    println!("  Added:           {}", profile.created_at.format("%Y-%m-%d"));

    Ok(())
}
