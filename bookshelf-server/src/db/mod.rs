//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - One pool, built at startup and injected into the router state
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Foreign keys on every connection so account deletion cascades

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_memory_pool, create_pool, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;

use std::path::Path;

use sqlx::SqlitePool;

/// Open the database at `path` and bring its schema up to date.
pub async fn connect(path: &Path, max_connections: u32) -> Result<SqlitePool, DbError> {
    let pool = create_pool(path, max_connections).await?;
    migrations::run(&pool).await?;
    Ok(pool)
}

/// Fresh in-memory database with the schema applied.
pub async fn connect_in_memory() -> Result<SqlitePool, DbError> {
    let pool = create_memory_pool().await?;
    migrations::run(&pool).await?;
    Ok(pool)
}
