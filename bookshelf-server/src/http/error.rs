//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses `{"error": ..., "status": ...}` with
//! appropriate status codes. Store and hashing failures are logged here and
//! answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::credentials::CredentialError;
use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Bad credentials (401)
    Unauthorized { message: &'static str },

    /// Resource not found (404)
    NotFound { message: String },

    /// Unique constraint violated (409)
    Conflict { message: String },

    /// Database error (500, logged)
    Database(DbError),

    /// Password hashing error (500, logged)
    Credentials(CredentialError),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) | Self::Credentials(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Validation(e) => e.to_string(),
            Self::Unauthorized { message } => message.to_owned(),
            Self::NotFound { message } | Self::Conflict { message } => message,
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                "Internal Server Error".to_owned()
            }
            Self::Credentials(e) => {
                tracing::error!("Credential error: {}", e);
                "Internal Server Error".to_owned()
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<CredentialError> for ApiError {
    fn from(e: CredentialError) -> Self {
        Self::Credentials(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, .. } => Self::not_found(not_found_message(resource)),
            DbError::Conflict { resource, detail } => Self::Conflict {
                message: conflict_message(resource, &detail),
            },
            DbError::NoFields => Self::Validation(ValidationError::MissingAny {
                message: "At least one field is required",
            }),
            DbError::Sqlx(_) => Self::Database(e),
        }
    }
}

fn not_found_message(resource: &str) -> String {
    match resource {
        "user" => "User not found".to_owned(),
        "book" => "Book not found".to_owned(),
        "learning" => "Learning entry not found".to_owned(),
        "user or book" => "User or book not found".to_owned(),
        other => format!("{} not found", other),
    }
}

fn conflict_message(resource: &str, detail: &str) -> String {
    match resource {
        "user" if detail.contains("users.email") => "Email is already registered".to_owned(),
        "user" if detail.contains("users.username") => "Username is already taken".to_owned(),
        "user" => "Username or email already exists".to_owned(),
        "favourite" => "Book is already in favourites".to_owned(),
        other => format!("{} already exists", other),
    }
}
