//! `~/.bookshelf/config.toml` and the `bookshelf config` subcommand
//!
//! Settings resolve in this order, first match wins:
//! 1. command-line flag
//! 2. environment (`BOOKSHELF_BIND`, `BOOKSHELF_DATABASE`), after `.env` files are loaded
//! 3. the config file
//! 4. built-in defaults
//!
//! Flags and environment are both handled by clap (`#[arg(env = ...)]`); this
//! module owns the file and the defaults.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bookshelf_server::db::DEFAULT_MAX_CONNECTIONS;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const CONFIG_DIR: &str = ".bookshelf";

/// Full CLI configuration; every section and field is optional in the file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookshelfConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    pub cors_permissive: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3001)),
            cors_permissive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub path: PathBuf,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: config_dir().join("bookshelf.db"),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// EnvFilter directive, e.g. `info` or `bookshelf_server=debug`
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `~/.bookshelf`, or `./.bookshelf` when there is no home directory
fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
}

impl BookshelfConfig {
    /// Get config file path: ~/.bookshelf/config.toml
    pub fn default_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load from `explicit`, or from the default path.
    ///
    /// A missing default file means defaults; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_file(path, true),
            None => Self::load_file(&Self::default_path(), false),
        }
    }

    fn load_file(path: &Path, required: bool) -> Result<Self> {
        if !path.exists() {
            if required {
                anyhow::bail!(
                    "Config not found at {:?}\n\nRun: bookshelf config init",
                    path
                );
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;

        let config: Self = toml::from_str(&content)
            .context(format!("Failed to parse config file (invalid TOML): {:?}", path))?;

        Ok(config)
    }
}

/// Outcome of `.env` loading, kept so it can be logged once tracing is up
#[derive(Debug, Default)]
pub struct EnvFiles {
    pub loaded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl EnvFiles {
    pub fn log(&self) {
        for path in &self.loaded {
            debug!("Loaded .env from {}", path.display());
        }
        for (path, err) in &self.failed {
            warn!("Failed to load {}: {}", path.display(), err);
        }
    }
}

/// Load `.env` from the current directory, then `~/.bookshelf/.env`.
///
/// Variables already set in the process environment are never overwritten, so
/// the shell beats the current directory, which beats the home directory.
/// Runs before tracing is initialized; call [`EnvFiles::log`] afterwards.
pub fn load_dotenv() -> EnvFiles {
    let mut candidates = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(".env"));
    }
    candidates.push(config_dir().join(".env"));

    load_env_files(&candidates)
}

fn load_env_files(candidates: &[PathBuf]) -> EnvFiles {
    let mut files = EnvFiles::default();
    for path in candidates.iter().filter(|p| p.is_file()) {
        match dotenvy::from_path(path) {
            Ok(()) => files.loaded.push(path.clone()),
            Err(e) => files.failed.push((path.clone(), e.to_string())),
        }
    }
    files
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Print the effective configuration as TOML
    Show,
    /// Write a config file with the default settings
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

/// Run a `bookshelf config` subcommand.
///
/// `effective` is the configuration after flags and environment were applied;
/// only `show` reads it.
pub fn run_config(args: ConfigArgs, path: &Path, effective: Result<BookshelfConfig>) -> Result<()> {
    match args.command {
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Show => {
            let toml_str = toml::to_string_pretty(&effective?)
                .context("Failed to serialize config to TOML")?;
            print!("{}", toml_str);
            Ok(())
        }
        ConfigCommands::Init(init) => run_init(path, init.force),
    }
}

fn run_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            path
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .context(format!("Failed to create {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(&BookshelfConfig::default())
        .context("Failed to serialize default config")?;
    fs::write(path, content).context(format!("Failed to write config file: {:?}", path))?;

    println!("Created config at: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: BookshelfConfig = toml::from_str(
            r#"
            [server]
            bind = "127.0.0.1:8080"

            [database]
            path = "/var/lib/bookshelf/books.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind.port(), 8080);
        assert!(!config.server.cors_permissive);
        assert_eq!(config.database.path, PathBuf::from("/var/lib/bookshelf/books.db"));
        assert_eq!(config.database.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn missing_optional_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = BookshelfConfig::load_file(&dir.path().join("absent.toml"), false).unwrap();
        assert_eq!(config, BookshelfConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = BookshelfConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("config init"));
    }

    #[test]
    fn invalid_toml_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server\nbind = ").unwrap();
        assert!(BookshelfConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn init_writes_loadable_defaults_and_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        run_init(&path, false).unwrap();
        let loaded = BookshelfConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded, BookshelfConfig::default());

        assert!(run_init(&path, false).is_err());
        run_init(&path, true).unwrap();
    }

    #[test]
    fn env_files_load_in_order_without_overwriting() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.env");
        let second = dir.path().join("second.env");
        fs::write(&first, "BOOKSHELF_TEST_ENV_ORDER=first\n").unwrap();
        fs::write(
            &second,
            "BOOKSHELF_TEST_ENV_ORDER=second\nBOOKSHELF_TEST_ENV_ONLY_SECOND=yes\n",
        )
        .unwrap();

        let files = load_env_files(&[first.clone(), dir.path().join("absent.env"), second.clone()]);

        assert_eq!(files.loaded, vec![first, second]);
        assert!(files.failed.is_empty());
        assert_eq!(std::env::var("BOOKSHELF_TEST_ENV_ORDER").unwrap(), "first");
        assert_eq!(std::env::var("BOOKSHELF_TEST_ENV_ONLY_SECOND").unwrap(), "yes");
    }
}
