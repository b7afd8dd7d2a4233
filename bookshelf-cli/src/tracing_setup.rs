//! Tracing setup for the bookshelf CLI
//!
//! Usage:
//!   bookshelf --debug serve               # Debug logging to console
//!   RUST_LOG=bookshelf_server=debug ...   # Fine-grained log control
//!
//! `RUST_LOG` wins when set. Otherwise `--debug` selects `debug`, and failing
//! that the `[logging] level` from the config file applies.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Enable debug logging (unless RUST_LOG is explicitly set)
    pub debug: bool,
    /// Filter used when neither RUST_LOG nor --debug is given
    pub level: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: "info".to_string(),
        }
    }
}

impl TracingConfig {
    fn fallback_directive(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.level
        }
    }
}

/// Initialize console tracing.
pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.fallback_directive()))
        .map_err(|err| anyhow!("invalid log level '{}': {}", config.level, err))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
