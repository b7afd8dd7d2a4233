//! Book repository
//!
//! The catalogue is read-only over HTTP; `insert` exists for `bookshelf seed`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};

use super::DbError;
use crate::models::RecordId;

const BOOK_COLUMNS: &str =
    "id, title, author, genre_id, summary, cover_image, created_at, updated_at";

/// Book record from database
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre_id: Option<i64>,
    pub summary: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Catalogue entry to insert
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub genre_id: Option<i64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
}

/// Book repository
pub struct BookRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BookRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All books in insertion order.
    pub async fn list(&self) -> Result<Vec<Book>, DbError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY id",
            BOOK_COLUMNS
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(books)
    }

    /// Single book by id.
    pub async fn get(&self, id: RecordId) -> Result<Option<Book>, DbError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = ?",
            BOOK_COLUMNS
        ))
        .bind(id.get())
        .fetch_optional(self.pool)
        .await?;

        Ok(book)
    }

    /// Newest books first.
    ///
    /// There is no popularity signal in the schema; "popular" means most
    /// recently added.
    pub async fn list_popular(&self) -> Result<Vec<Book>, DbError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY created_at DESC, id DESC",
            BOOK_COLUMNS
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(books)
    }

    /// Add a catalogue entry.
    pub async fn insert(&self, book: &NewBook) -> Result<Book, DbError> {
        Ok(insert_book(self.pool, book).await?)
    }

    /// Add several entries in one transaction; on any failure none are kept.
    pub async fn insert_all(&self, books: &[NewBook]) -> Result<Vec<Book>, DbError> {
        let mut tx = self.pool.begin().await?;

        let mut inserted = Vec::with_capacity(books.len());
        for book in books {
            inserted.push(insert_book(&mut *tx, book).await?);
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

async fn insert_book<'e, E>(executor: E, book: &NewBook) -> Result<Book, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Book>(&format!(
        r#"
        INSERT INTO books (title, author, genre_id, summary, cover_image, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING {}
        "#,
        BOOK_COLUMNS
    ))
    .bind(&book.title)
    .bind(&book.author)
    .bind(book.genre_id)
    .bind(book.summary.as_deref())
    .bind(book.cover_image.as_deref())
    .fetch_one(executor)
    .await
}
