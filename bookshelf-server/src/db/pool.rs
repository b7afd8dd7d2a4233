//! SQLite connection pool management
//!
//! The pool is built once at startup and handed to the router state. Every
//! connection enforces foreign keys, which is what makes account deletion
//! cascade to favourites and learnings.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Default maximum connections for the pool.
/// Kept low; SQLite serializes writers anyway.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Open (creating if needed) the database file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or created.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(Path::new("library.db"), DEFAULT_MAX_CONNECTIONS).await?;
/// ```
pub async fn create_pool(path: &Path, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await
}

/// Private in-memory database.
///
/// A single connection that is never recycled: each SQLite `:memory:`
/// connection is its own database.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}
