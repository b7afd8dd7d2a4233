//! User repository
//!
//! Accounts are keyed by integer id; username and email are each unique.
//! The stored `password` column only ever holds a digest from
//! [`crate::credentials`].

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use super::DbError;
use crate::models::{Email, RecordId, Username};

/// Full user row, including the password digest
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Public projection of a user
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Partial profile update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<Username>,
    pub email: Option<Email>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a user whose email or username equals `identifier`.
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, created_at, updated_at
            FROM users
            WHERE email = ? OR username = ?
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .bind(identifier)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a user, returning the new id.
    ///
    /// Fails with `Conflict` when the username or email is taken.
    pub async fn create(
        &self,
        username: &Username,
        email: &Email,
        password_hash: &str,
    ) -> Result<RecordId, DbError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password, created_at, updated_at)
            VALUES (?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            RETURNING id
            "#,
        )
        .bind(username.as_str())
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::from_write(e, "user", "user", username.as_str()))?;

        RecordId::new(id).ok_or_else(|| DbError::not_found("user", id))
    }

    /// Replace the password digest for the account with `email`.
    pub async fn update_password(&self, email: &str, new_hash: &str) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE users SET password = ?, updated_at = CURRENT_TIMESTAMP WHERE email = ?",
        )
        .bind(new_hash)
        .bind(email)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("user", email));
        }
        Ok(())
    }

    /// Get the public profile for `id`.
    pub async fn get(&self, id: RecordId) -> Result<Option<UserProfile>, DbError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT id, username, email FROM users WHERE id = ?",
        )
        .bind(id.get())
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    /// Change only the supplied fields.
    pub async fn update(&self, id: RecordId, fields: &UserUpdate) -> Result<(), DbError> {
        if fields.is_empty() {
            return Err(DbError::NoFields);
        }

        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = COALESCE(?, username),
                email = COALESCE(?, email),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(fields.username.as_ref().map(Username::as_str))
        .bind(fields.email.as_ref().map(Email::as_str))
        .bind(id.get())
        .execute(self.pool)
        .await
        .map_err(|e| DbError::from_write(e, "user", "user", id))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("user", id));
        }
        Ok(())
    }

    /// Delete the account; favourites and learnings go with it.
    pub async fn delete(&self, id: RecordId) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.get())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("user", id));
        }
        Ok(())
    }
}
