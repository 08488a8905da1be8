use anyhow::Result;
use paperwork_core::completeness;
use paperwork_core::schema::Database;
use paperwork_cwr::Config;

pub fn show_status(db: &Database, config: &Config) -> Result<()> {
    let songs = db.list_compositions()?;

    let mut incomplete = Vec::new();
    for song in &songs {
        let writers = db.list_writers_for_composition(&song.id)?;
        let missing = completeness::check(song, &writers);
        if !missing.is_empty() {
            incomplete.push((song, missing));
        }
    }

    println!("\n📊 Paperwork Status\n");
    println!("  Database: {}", config.database_path.display());
    println!("  Sender:   {} ({})", config.sender.sender_name, config.sender.sender_type);
    println!("  Songs: {}", songs.len());
    println!("  Ready to register: {}", songs.len() - incomplete.len());
    println!("  Missing registration data: {}", incomplete.len());

    for (song, missing) in &incomplete {
        println!("\n  {} ({})", song.title, song.id);
        for item in missing {
            println!("    - {item}");
        }
    }

    if !incomplete.is_empty() {
        println!("\n  Run `paperwork check <song-id>` for details on a single song");
    }

    Ok(())
}
