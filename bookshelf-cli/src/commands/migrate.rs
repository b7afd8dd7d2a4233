//! Create or update the database schema

use anyhow::Result;

use super::open_database;
use crate::config::BookshelfConfig;

/// Apply the schema; running it again is a no-op.
pub async fn run_migrate(config: &BookshelfConfig) -> Result<()> {
    let pool = open_database(&config.database).await?;
    pool.close().await;

    println!("Schema is up to date: {}", config.database.path.display());
    Ok(())
}
