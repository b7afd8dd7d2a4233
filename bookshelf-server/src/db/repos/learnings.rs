//! Learning repository
//!
//! Free-text notes a user keeps per book. Several per (user, book) are allowed.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use super::DbError;
use crate::models::RecordId;

/// Learning record from database
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Learning {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub learning: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Learning repository
pub struct LearningRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LearningRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a learning; `NotFound` if the user or book is absent.
    pub async fn create(
        &self,
        user_id: RecordId,
        book_id: RecordId,
        text: &str,
    ) -> Result<Learning, DbError> {
        let learning = sqlx::query_as::<_, Learning>(
            r#"
            INSERT INTO book_learnings (user_id, book_id, learning, created_at, updated_at)
            VALUES (?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            RETURNING id, user_id, book_id, learning, created_at, updated_at
            "#,
        )
        .bind(user_id.get())
        .bind(book_id.get())
        .bind(text)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            DbError::from_write(e, "learning", "user or book", format!("{}/{}", user_id, book_id))
        })?;

        Ok(learning)
    }

    /// Learnings for one user and book, oldest first.
    pub async fn list(&self, user_id: RecordId, book_id: RecordId) -> Result<Vec<Learning>, DbError> {
        let learnings = sqlx::query_as::<_, Learning>(
            r#"
            SELECT id, user_id, book_id, learning, created_at, updated_at
            FROM book_learnings
            WHERE user_id = ? AND book_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id.get())
        .bind(book_id.get())
        .fetch_all(self.pool)
        .await?;

        Ok(learnings)
    }

    /// Replace the text of a learning.
    ///
    /// Matches on id, user and book together, so an id that belongs to another
    /// user or book is `NotFound`.
    pub async fn update(
        &self,
        id: RecordId,
        user_id: RecordId,
        book_id: RecordId,
        text: &str,
    ) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE book_learnings
            SET learning = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND user_id = ? AND book_id = ?
            "#,
        )
        .bind(text)
        .bind(id.get())
        .bind(user_id.get())
        .bind(book_id.get())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("learning", id));
        }
        Ok(())
    }

    /// Delete a learning. Returns whether a row was removed.
    pub async fn delete(&self, id: RecordId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM book_learnings WHERE id = ?")
            .bind(id.get())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
