use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Who is submitting a registration file, and the format constants that go
/// with it.
///
/// These values fill the header and group-header records and name the
/// generated file. Missing keys in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderIdentity {
    /// Sender type code (e.g., "PB" for publisher).
    pub sender_type: String,

    /// Sender id assigned by the receiving society.
    pub sender_id: u64,

    pub sender_name: String,

    /// Version token closing the header record.
    pub header_version: String,

    /// Transaction type announced by the group header.
    pub transaction_type: String,

    pub group_id: u32,

    /// Format version announced by the group header.
    pub format_version: String,

    pub batch_request: u64,

    /// Language code of work titles.
    pub language_code: String,

    /// Extension of the generated file.
    pub file_extension: String,
}

impl Default for SenderIdentity {
    fn default() -> Self {
        Self {
            sender_type: String::from("PB"),
            sender_id: 0,
            sender_name: String::from("PAPERWORK SYSTEM"),
            header_version: String::from("00.00"),
            transaction_type: String::from("NWR"),
            group_id: 1,
            format_version: String::from("02.10"),
            batch_request: 0,
            language_code: String::from("EN"),
            file_extension: String::from("V21"),
        }
    }
}

/// Configuration for paperwork.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (PAPERWORK_* prefix)
/// 3. Config file (~/.config/paperwork/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: PAPERWORK_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/paperwork/paperwork.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Sender identity written into exported files.
    ///
    /// Set via the `[sender]` table of the config file.
    #[serde(default)]
    pub sender: SenderIdentity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            sender: SenderIdentity::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/paperwork/config.toml
    /// Reads environment variables with PAPERWORK_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("paperwork");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?;

        log::debug!("Loaded configuration from {}", config_path.display());

        Ok(config)
    }

    /// Load configuration with custom database path.
    ///
    /// This is used when the --db CLI flag is provided.
    pub fn load_with_db_path(db_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.database_path = db_path;
        Ok(config)
    }
}

/// Get the default database path.
///
/// Returns: ~/.local/share/paperwork/paperwork.db (or platform equivalent)
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paperwork")
        .join("paperwork.db")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/paperwork/config.toml
/// - macOS: ~/Library/Application Support/paperwork/config.toml
/// - Windows: %APPDATA%\paperwork\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paperwork")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Paperwork Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (PAPERWORK_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the SQLite database
#
# Stores songs, writer profiles, splits and the audit log
#
# Can also be set via:
# - CLI: paperwork --db /custom/path.db status
# - Environment: PAPERWORK_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/paperwork.db"

# Sender identity written into the header of exported registration files.
# Ask the receiving society for your sender type and id.
[sender]
sender_type = "PB"
sender_id = 0
sender_name = "PAPERWORK SYSTEM"
header_version = "00.00"
transaction_type = "NWR"
group_id = 1
format_version = "02.10"
batch_request = 0
language_code = "EN"
file_extension = "V21"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    log::info!("Created config file {}", config_path.display());

    Ok(true)
}
