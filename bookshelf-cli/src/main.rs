//! bookshelf CLI - operate the bookshelf HTTP API
//!
//! - `serve`: run the API server
//! - `migrate`: create or update the SQLite schema
//! - `seed`: load catalogue entries from a JSON file
//! - `config`: inspect or create `~/.bookshelf/config.toml`

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use config::{BookshelfConfig, EnvFiles};

#[derive(Parser, Debug)]
#[command(
    name = "bookshelf",
    author,
    version,
    about = "Book catalogue API with favourites, learnings and accounts",
    long_about = "Serve the bookshelf REST API over SQLite, manage its schema, \
                  and seed the book catalogue."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.bookshelf/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// SQLite database file (overrides the config file)
    #[arg(long, global = true, value_name = "PATH", env = "BOOKSHELF_DATABASE")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create or update the database schema
    Migrate,
    /// Insert books from a JSON file into the catalogue
    Seed(commands::seed::SeedArgs),
    /// Manage bookshelf configuration (path, show, init)
    Config(config::ConfigArgs),
}

impl Cli {
    /// File settings with the `--database` / `BOOKSHELF_DATABASE` override applied.
    fn effective_config(&self) -> Result<BookshelfConfig> {
        let mut config = BookshelfConfig::load(self.config.as_deref())?;
        if let Some(path) = &self.database {
            config.database.path = path.clone();
        }
        Ok(config)
    }
}

/// Configure logging for commands that run the service, then report what
/// was loaded before the subscriber existed.
fn start(
    debug: bool,
    effective: Result<BookshelfConfig>,
    config_path: &Path,
    env_files: &EnvFiles,
) -> Result<BookshelfConfig> {
    let config = effective?;
    tracing_setup::init(&tracing_setup::TracingConfig {
        debug,
        level: config.logging.level.clone(),
    })?;

    env_files.log();
    if config_path.exists() {
        tracing::debug!("Loaded config from {}", config_path.display());
    } else {
        tracing::debug!("No config at {}, using defaults", config_path.display());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so clap sees variables from .env files
    let env_files = config::load_dotenv();
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(BookshelfConfig::default_path);
    let effective = cli.effective_config();

    let debug = cli.debug;
    let ready = |effective| start(debug, effective, &config_path, &env_files);

    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args, &ready(effective)?).await?,
        Commands::Migrate => commands::migrate::run_migrate(&ready(effective)?).await?,
        Commands::Seed(args) => commands::seed::run_seed(args, &ready(effective)?).await?,
        Commands::Config(args) => config::run_config(args, &config_path, effective)?,
    }

    Ok(())
}
