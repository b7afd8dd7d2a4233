//! Subcommand implementations

pub mod migrate;
pub mod seed;
pub mod serve;

use anyhow::{Context, Result};
use bookshelf_server::SqlitePool;

use crate::config::DatabaseSection;

/// Open the configured database, creating its directory and schema if needed.
pub async fn open_database(db: &DatabaseSection) -> Result<SqlitePool> {
    if let Some(parent) = db.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create {}", parent.display()))?;
    }

    let pool = bookshelf_server::connect(&db.path, db.max_connections)
        .await
        .context(format!("Failed to open database at {}", db.path.display()))?;

    tracing::debug!(path = %db.path.display(), "database ready");
    Ok(pool)
}
