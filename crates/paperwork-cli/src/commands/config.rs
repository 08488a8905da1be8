use anyhow::Result;
use paperwork_cwr::{config, Config};
use std::path::PathBuf;

/// Show the current effective configuration.
pub fn show_config(db: Option<PathBuf>) -> Result<()> {
    let config = match db {
        Some(path) => Config::load_with_db_path(path)?,
        None => Config::load()?,
    };

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    let sender = &config.sender;
    println!("Settings:");
    println!("  database_path: {}", config.database_path.display());
    println!("  sender.sender_type: {}", sender.sender_type);
    println!("  sender.sender_id: {}", sender.sender_id);
    println!("  sender.sender_name: {}", sender.sender_name);
    println!("  sender.header_version: {}", sender.header_version);
    println!("  sender.transaction_type: {}", sender.transaction_type);
    println!("  sender.group_id: {}", sender.group_id);
    println!("  sender.format_version: {}", sender.format_version);
    println!("  sender.batch_request: {}", sender.batch_request);
    println!("  sender.language_code: {}", sender.language_code);
    println!("  sender.file_extension: {}", sender.file_extension);

    println!("\nPriority: CLI args > ENV vars (PAPERWORK_*) > Config file > Defaults");

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit the [sender] table before submitting exports.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
