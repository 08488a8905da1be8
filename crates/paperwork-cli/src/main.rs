use anyhow::{Context, Result};
use clap::Parser;
use paperwork_core::model::{CompositionId, ProfileId, Share, WriterId};
use paperwork_core::schema::Database;
use paperwork_cwr::Config;
use commands::writer::RoleArg;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "paperwork", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/paperwork/paperwork.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    #[command(flatten)]
    Catalog(CatalogCommand),

    /// Print the fields of each record in a registration file
    Inspect {
        /// Path to a generated registration file
        file: PathBuf,
    },
    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Commands that read or write the catalog database.
#[derive(Debug, clap::Subcommand)]
enum CatalogCommand {
    /// Manage songs (compositions)
    #[command(subcommand)]
    Song(SongCommand),

    /// Manage writer profiles
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Manage writer credits and splits on a song
    #[command(subcommand)]
    Writer(WriterCommand),

    /// Export a song as a CWR work-registration file
    ///
    /// Generates a fixed-width registration file containing a header, a
    /// group header, the work registration, one writer record per credited
    /// writer and a trailer, joined with CRLF line endings.
    ///
    /// Missing data (work code, registrant codes, names) never blocks the
    /// export: it is written as blanks or zeros and reported as a warning.
    /// Run 'paperwork check' to see what is missing before submitting.
    ///
    /// The file is named after the song title with spaces replaced by
    /// underscores, e.g. Test_Song.V21.
    Export {
        /// Song id
        song: CompositionId,

        /// Directory to write the file into (default: current directory)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the file to stdout instead of writing it
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },
    /// List registration data a song is missing
    Check {
        /// Song id
        song: CompositionId,
    },
    /// Show catalog status
    Status,
}

#[derive(Debug, clap::Subcommand)]
enum SongCommand {
    /// Add a song
    Add {
        title: String,

        /// Work code (ISWC), e.g. T-123.456.789-3
        #[arg(long)]
        work_code: Option<String>,

        /// Profile to credit as sole writer at 100%
        #[arg(long)]
        writer: Option<ProfileId>,
    },
    /// List songs
    List,
    /// Show a song with its writers
    Show { id: CompositionId },
    /// Change a song's title or work code
    Update {
        id: CompositionId,

        #[arg(long)]
        title: Option<String>,

        /// New work code; pass an empty string to clear it
        #[arg(long)]
        work_code: Option<String>,
    },
    /// Delete a song and its writer credits
    Delete { id: CompositionId },
    /// Import songs from a distributor or society CSV export
    ///
    /// Titles are read from the first non-empty of the "Title", "Track
    /// Title", "Work Title" or "Song Name" columns, work codes from "ISWC"
    /// or "ISWC Code". Rows matching an existing song by work code, then by
    /// title, are not duplicated; a matched song without a work code gets
    /// the row's code.
    Import {
        /// Path to the CSV file
        file: PathBuf,

        /// Profile credited at 100% on newly created songs; title matches
        /// are limited to songs crediting it
        #[arg(long)]
        writer: Option<ProfileId>,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ProfileCommand {
    /// Add a writer profile
    Add {
        name: String,

        /// Registrant (IPI) code assigned by a collection society
        #[arg(long)]
        registrant_code: Option<String>,
    },
    /// Show a writer profile
    Show { id: ProfileId },
}

#[derive(Debug, clap::Subcommand)]
enum WriterCommand {
    /// Credit a writer on a song
    Add {
        song: CompositionId,

        /// Ownership share in percent (0-100)
        #[arg(long)]
        share: Share,

        /// Link the credit to a writer profile
        #[arg(long, conflicts_with_all = ["name", "registrant_code"])]
        profile: Option<ProfileId>,

        /// Writer name, for writers without a profile
        #[arg(long)]
        name: Option<String>,

        /// Registrant (IPI) code, for writers without a profile
        #[arg(long)]
        registrant_code: Option<String>,

        /// Creative role
        #[arg(long, value_enum, default_value_t = RoleArg::Composer)]
        role: RoleArg,
    },
    /// Remove a writer credit
    Remove { id: WriterId },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

fn load_config(db: Option<PathBuf>) -> Result<Config> {
    match db {
        Some(path) => Config::load_with_db_path(path),
        None => Config::load(),
    }
}

fn open_database(config: &Config) -> Result<Database> {
    log::debug!("Opening database {}", config.database_path.display());
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }
    Database::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open database {}",
            config.database_path.display()
        )
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog(command) => {
            let config = load_config(cli.db)?;
            let db = open_database(&config)?;
            run_catalog_command(command, &db, &config)
        }
        Commands::Inspect { file } => commands::inspect::run_inspect(&file),
        Commands::Config(action) => match action {
            ConfigCommand::Show => commands::config::show_config(cli.db),
            ConfigCommand::Path => commands::config::show_path(),
            ConfigCommand::Example => commands::config::show_example(),
            ConfigCommand::Init => commands::config::init_config(),
        },
    }
}

fn run_catalog_command(command: CatalogCommand, db: &Database, config: &Config) -> Result<()> {
    match command {
        CatalogCommand::Song(action) => match action {
            SongCommand::Add {
                title,
                work_code,
                writer,
            } => commands::song::add_song(db, title, work_code, writer),
            SongCommand::List => commands::song::list_songs(db),
            SongCommand::Show { id } => commands::song::show_song(db, &id),
            SongCommand::Update {
                id,
                title,
                work_code,
            } => commands::song::update_song(db, &id, title, work_code),
            SongCommand::Delete { id } => commands::song::delete_song(db, &id),
            SongCommand::Import { file, writer } => {
                commands::song::import_songs(db, &file, writer.as_ref())
            }
        },
        CatalogCommand::Profile(action) => match action {
            ProfileCommand::Add {
                name,
                registrant_code,
            } => commands::profile::add_profile(db, name, registrant_code),
            ProfileCommand::Show { id } => commands::profile::show_profile(db, &id),
        },
        CatalogCommand::Writer(action) => match action {
            WriterCommand::Add {
                song,
                share,
                profile,
                name,
                registrant_code,
                role,
            } => commands::writer::add_writer(
                db,
                commands::writer::NewCredit {
                    song,
                    share,
                    profile,
                    name,
                    registrant_code,
                    role,
                },
            ),
            WriterCommand::Remove { id } => commands::writer::remove_writer(db, &id),
        },
        CatalogCommand::Export { song, out, stdout } => {
            commands::run_export(db, config, &song, out, stdout)
        }
        CatalogCommand::Check { song } => commands::run_check(db, &song),
        CatalogCommand::Status => commands::show_status(db, config),
    }
}
