//! Favourite endpoints
//!
//! A favourite is a (user, book) pair. Removing or touching a pair that does
//! not exist still answers 200.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

use super::auth::SuccessResponse;
use crate::db::{Book, FavouriteRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, PathId};
use crate::http::server::AppState;
use crate::models::{non_blank, IdInput, RecordId, ValidationError};

/// Body shared by add, remove and update
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteRequest {
    pub user_id: Option<IdInput>,
    pub book_id: Option<IdInput>,
}

impl FavouriteRequest {
    fn ids(self) -> Result<(RecordId, RecordId), ValidationError> {
        let (Some(user_id), Some(book_id)) = (non_blank(self.user_id), non_blank(self.book_id))
        else {
            return Err(ValidationError::MissingAny {
                message: "Missing userId or bookId",
            });
        };

        Ok((
            user_id.into_record_id("userId")?,
            book_id.into_record_id("bookId")?,
        ))
    }
}

/// GET /favourites/{user_id} - the user's favourite books
async fn list_favourites(
    State(state): State<Arc<AppState>>,
    PathId(user_id): PathId,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books = FavouriteRepo::new(&state.pool).list(user_id).await?;
    Ok(Json(books))
}

/// POST /add-to-favourites
async fn add_favourite(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<FavouriteRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let (user_id, book_id) = req.ids()?;
    FavouriteRepo::new(&state.pool).add(user_id, book_id).await?;

    tracing::info!(user_id = user_id.get(), book_id = book_id.get(), "favourite added");
    Ok(Json(SuccessResponse::new("Book added to favourites")))
}

/// DELETE /remove-from-favourites
async fn remove_favourite(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<FavouriteRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let (user_id, book_id) = req.ids()?;
    if !FavouriteRepo::new(&state.pool).remove(user_id, book_id).await? {
        tracing::debug!(user_id = user_id.get(), book_id = book_id.get(), "no favourite to remove");
    }

    Ok(Json(SuccessResponse::new("Book removed from favourites")))
}

/// PUT /update-favourite - refresh the pair's timestamp
async fn update_favourite(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<FavouriteRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let (user_id, book_id) = req.ids()?;
    if !FavouriteRepo::new(&state.pool).touch(user_id, book_id).await? {
        tracing::debug!(user_id = user_id.get(), book_id = book_id.get(), "no favourite to update");
    }

    Ok(Json(SuccessResponse::new("Favourite updated successfully")))
}

/// Favourite routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/favourites/{user_id}", get(list_favourites))
        .route("/add-to-favourites", post(add_favourite))
        .route("/remove-from-favourites", delete(remove_favourite))
        .route("/update-favourite", put(update_favourite))
}
