//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool; one method per operation, all SQL parameterized
//! - Single-row reads return `Option`, absence is not an error
//! - Writes that must hit a row return `DbError::NotFound` when none matched
//! - Uniqueness comes from constraints; violations become `DbError::Conflict`

pub mod books;
pub mod favourites;
pub mod learnings;
pub mod users;

pub use books::{Book, BookRepo, NewBook};
pub use favourites::FavouriteRepo;
pub use learnings::{Learning, LearningRepo};
pub use users::{User, UserProfile, UserRepo, UserUpdate};

use sqlx::error::ErrorKind;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict on {resource}: {detail}")]
    Conflict {
        resource: &'static str,
        detail: String,
    },

    #[error("no fields to update")]
    NoFields,
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Classify constraint violations on writes.
    ///
    /// Unique violations become `Conflict`; foreign key violations mean a
    /// referenced row is absent and become `NotFound` for `missing`.
    pub(crate) fn from_write(
        err: sqlx::Error,
        resource: &'static str,
        missing: &'static str,
        id: impl ToString,
    ) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return Self::Conflict {
                        resource,
                        detail: db_err.message().to_owned(),
                    }
                }
                ErrorKind::ForeignKeyViolation => return Self::not_found(missing, id),
                _ => {}
            }
        }
        Self::Sqlx(err)
    }
}
