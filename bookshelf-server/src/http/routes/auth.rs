//! Account endpoints: login, register, reset-password, logout
//!
//! No session or token is issued. Login answers with the user id and the client
//! keeps it; see the module docs in [`super`] for what that implies.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::UserRepo;
use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;
use crate::models::{non_empty, Email, Username, ValidationError};

const ALL_FIELDS_REQUIRED: ValidationError = ValidationError::MissingAny {
    message: "All fields are required",
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username_or_email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub new_password: Option<String>,
    pub confirm_new_password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// POST /login
async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (Some(identifier), Some(password)) =
        (non_empty(req.username_or_email), non_empty(req.password))
    else {
        return Err(ValidationError::MissingAny {
            message: "Username/Email and Password are required",
        }
        .into());
    };

    let Some(user) = UserRepo::new(&state.pool).find_by_identifier(&identifier).await? else {
        tracing::debug!("login for unknown identifier");
        return Err(ApiError::Unauthorized {
            message: "No user found with this email/username",
        });
    };

    if !state.credentials.verify_blocking(password, user.password).await? {
        tracing::debug!(user_id = user.id, "login with incorrect password");
        return Err(ApiError::Unauthorized {
            message: "Incorrect password",
        });
    }

    tracing::info!(user_id = user.id, "user logged in");
    Ok(Json(AuthResponse {
        success: true,
        message: Some("Login successful".to_owned()),
        user_id: user.id,
    }))
}

/// POST /register
async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (Some(username), Some(email), Some(password), Some(confirm)) = (
        non_empty(req.username),
        non_empty(req.email),
        non_empty(req.password),
        non_empty(req.confirm_password),
    ) else {
        return Err(ALL_FIELDS_REQUIRED.into());
    };

    if password != confirm {
        return Err(ValidationError::Mismatch.into());
    }

    let username = Username::new(&username)?;
    let email = Email::new(&email)?;

    let digest = state.credentials.hash_blocking(password).await?;
    let user_id = UserRepo::new(&state.pool)
        .create(&username, &email, &digest)
        .await?;

    tracing::info!(user_id = user_id.get(), "user registered");
    Ok(Json(AuthResponse {
        success: true,
        message: None,
        user_id: user_id.get(),
    }))
}

/// POST /reset-password
async fn reset_password(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let (Some(email), Some(password), Some(confirm)) = (
        non_empty(req.email),
        non_empty(req.new_password),
        non_empty(req.confirm_new_password),
    ) else {
        return Err(ALL_FIELDS_REQUIRED.into());
    };

    if password != confirm {
        return Err(ValidationError::Mismatch.into());
    }

    let digest = state.credentials.hash_blocking(password).await?;
    match UserRepo::new(&state.pool).update_password(&email, &digest).await {
        Ok(()) => {}
        // Unknown email is a client error on this route, not a 404
        Err(crate::db::DbError::NotFound { .. }) => {
            return Err(ValidationError::Unknown {
                message: "Email not found",
            }
            .into())
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!("password reset");
    Ok(Json(SuccessResponse::new("Password reset successful")))
}

/// POST /logout
///
/// Nothing is held server-side, so there is nothing to end.
async fn logout() -> Json<SuccessResponse> {
    Json(SuccessResponse::new("Logged out successfully"))
}

/// Account routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/reset-password", post(reset_password))
        .route("/logout", post(logout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn logout_always_succeeds() {
        let Json(body) = logout().await;
        assert!(body.success);
    }
}
