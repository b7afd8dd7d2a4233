//! Schema migrations
//!
//! Idempotent `CREATE ... IF NOT EXISTS` statements, run at startup and by
//! `bookshelf migrate`. Constraints carry the uniqueness rules: usernames and
//! emails are unique, and a (user, book) pair can be favourited once.

use sqlx::SqlitePool;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    ),
    (
        "books",
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            genre_id INTEGER,
            summary TEXT,
            cover_image TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    ),
    (
        "favourites",
        r#"
        CREATE TABLE IF NOT EXISTS favourites (
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (user_id, book_id)
        )
        "#,
    ),
    (
        "book_learnings",
        r#"
        CREATE TABLE IF NOT EXISTS book_learnings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
            learning TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    ),
    (
        "idx_books_created_at",
        "CREATE INDEX IF NOT EXISTS idx_books_created_at ON books (created_at)",
    ),
    (
        "idx_learnings_user_book",
        "CREATE INDEX IF NOT EXISTS idx_learnings_user_book ON book_learnings (user_id, book_id)",
    ),
];

/// Run all migrations
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running schema migrations...");

    for &(name, sql) in STATEMENTS {
        tracing::debug!(object = name, "applying migration");
        sqlx::query(sql).execute(pool).await?;
    }

    tracing::info!("Schema migrations complete");
    Ok(())
}
