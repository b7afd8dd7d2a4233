//! Favourite repository
//!
//! A favourite is the (user_id, book_id) pair; the composite primary key keeps
//! each pair unique.

use sqlx::SqlitePool;

use super::{Book, DbError};
use crate::models::RecordId;

/// Favourite repository
pub struct FavouriteRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FavouriteRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Books the user has favourited, in the order they were added.
    pub async fn list(&self, user_id: RecordId) -> Result<Vec<Book>, DbError> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.id, b.title, b.author, b.genre_id, b.summary, b.cover_image,
                   b.created_at, b.updated_at
            FROM books b
            JOIN favourites f ON b.id = f.book_id
            WHERE f.user_id = ?
            ORDER BY f.rowid
            "#,
        )
        .bind(user_id.get())
        .fetch_all(self.pool)
        .await?;

        Ok(books)
    }

    /// Favourite a book.
    ///
    /// `Conflict` if already favourited; `NotFound` if the user or book is absent.
    pub async fn add(&self, user_id: RecordId, book_id: RecordId) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO favourites (user_id, book_id, created_at, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            "#,
        )
        .bind(user_id.get())
        .bind(book_id.get())
        .execute(self.pool)
        .await
        .map_err(|e| {
            DbError::from_write(e, "favourite", "user or book", format!("{}/{}", user_id, book_id))
        })?;

        Ok(())
    }

    /// Remove a favourite. Returns whether a row was removed.
    pub async fn remove(&self, user_id: RecordId, book_id: RecordId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM favourites WHERE user_id = ? AND book_id = ?")
            .bind(user_id.get())
            .bind(book_id.get())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Bump `updated_at` only. Returns whether the favourite exists.
    pub async fn touch(&self, user_id: RecordId, book_id: RecordId) -> Result<bool, DbError> {
        let result = sqlx::query(
            "UPDATE favourites SET updated_at = CURRENT_TIMESTAMP WHERE user_id = ? AND book_id = ?",
        )
        .bind(user_id.get())
        .bind(book_id.get())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
