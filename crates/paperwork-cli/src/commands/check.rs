use anyhow::{Context, Result};
use paperwork_core::completeness;
use paperwork_core::model::CompositionId;
use paperwork_core::schema::Database;

pub fn run_check(db: &Database, song: &CompositionId) -> Result<()> {
    let source = db
        .load_export_source(song)?
        .with_context(|| format!("Song not found: {song}"))?;

    let missing = completeness::check(&source.composition, &source.writers);

    if missing.is_empty() {
        println!("✓ {} is ready to register", source.composition.title);
        return Ok(());
    }

    println!(
        "⚠ {} is missing {} item(s):",
        source.composition.title,
        missing.len()
    );
    for item in &missing {
        println!("  - {item}");
    }
    println!("\nThe file can still be exported; missing values are written as blanks or zeros.");

    Ok(())
}
