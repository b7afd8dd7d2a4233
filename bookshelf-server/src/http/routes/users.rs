//! Account profile endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;

use super::auth::SuccessResponse;
use crate::db::{UserProfile, UserRepo, UserUpdate};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, PathId};
use crate::http::server::AppState;
use crate::models::{non_empty, Email, Username};

/// Partial profile update; empty strings are ignored
#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UpdateUserRequest {
    fn into_update(self) -> Result<UserUpdate, ApiError> {
        Ok(UserUpdate {
            username: non_empty(self.username)
                .map(|u| Username::new(&u))
                .transpose()?,
            email: non_empty(self.email).map(|e| Email::new(&e)).transpose()?,
        })
    }
}

/// GET /user/{user_id}
async fn get_user(
    State(state): State<Arc<AppState>>,
    PathId(user_id): PathId,
) -> Result<Json<UserProfile>, ApiError> {
    UserRepo::new(&state.pool)
        .get(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// PUT /user/{user_id}
async fn update_user(
    State(state): State<Arc<AppState>>,
    PathId(user_id): PathId,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let update = req.into_update()?;
    UserRepo::new(&state.pool).update(user_id, &update).await?;

    tracing::info!(user_id = user_id.get(), "user updated");
    Ok(Json(SuccessResponse::new("User updated successfully")))
}

/// DELETE /user/{user_id} - also drops the user's favourites and learnings
async fn delete_user(
    State(state): State<Arc<AppState>>,
    PathId(user_id): PathId,
) -> Result<Json<SuccessResponse>, ApiError> {
    UserRepo::new(&state.pool).delete(user_id).await?;

    tracing::info!(user_id = user_id.get(), "user deleted");
    Ok(Json(SuccessResponse::new("User account deleted successfully")))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/user/{user_id}",
        get(get_user).put(update_user).delete(delete_user),
    )
}
