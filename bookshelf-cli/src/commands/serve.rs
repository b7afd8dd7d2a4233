//! HTTP server command
//!
//! Opens the database, brings the schema up to date and serves the API until
//! Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use bookshelf_server::{run_server, ServerConfig};
use clap::Parser;

use super::open_database;
use crate::config::BookshelfConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default from config, else 0.0.0.0:3001)
    #[arg(long, short = 'b', env = "BOOKSHELF_BIND")]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

impl ServeArgs {
    fn server_config(&self, config: &BookshelfConfig) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind.unwrap_or(config.server.bind),
            cors_permissive: self.cors_permissive || config.server.cors_permissive,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: &BookshelfConfig) -> Result<()> {
    let server_config = args.server_config(config);
    tracing::info!(
        "Starting bookshelf server on {} (database: {})",
        server_config.bind_addr,
        config.database.path.display()
    );

    let pool = open_database(&config.database).await?;

    // Blocks until shutdown
    run_server(pool, server_config)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_config_file() {
        let mut config = BookshelfConfig::default();
        config.server.bind = "127.0.0.1:4000".parse().unwrap();

        let args = ServeArgs {
            bind: Some("127.0.0.1:5000".parse().unwrap()),
            cors_permissive: false,
        };
        assert_eq!(args.server_config(&config).bind_addr.port(), 5000);

        let args = ServeArgs {
            bind: None,
            cors_permissive: false,
        };
        assert_eq!(args.server_config(&config).bind_addr.port(), 4000);
    }

    #[test]
    fn cors_enabled_by_either_source() {
        let mut config = BookshelfConfig::default();
        let args = ServeArgs {
            bind: None,
            cors_permissive: true,
        };
        assert!(args.server_config(&config).cors_permissive);

        config.server.cors_permissive = true;
        let args = ServeArgs {
            bind: None,
            cors_permissive: false,
        };
        assert!(args.server_config(&config).cors_permissive);
    }
}
