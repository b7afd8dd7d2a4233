//! Catalogue endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::{Book, BookRepo};
use crate::http::error::ApiError;
use crate::http::extractors::PathId;
use crate::http::server::AppState;

/// GET /books - every book in the catalogue
async fn list_books(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = BookRepo::new(&state.pool).list().await?;
    Ok(Json(books))
}

/// GET /books/popular - newest first
async fn popular_books(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = BookRepo::new(&state.pool).list_popular().await?;
    Ok(Json(books))
}

/// GET /books/{book_id}
async fn get_book(
    State(state): State<Arc<AppState>>,
    PathId(book_id): PathId,
) -> Result<Json<Book>, ApiError> {
    BookRepo::new(&state.pool)
        .get(book_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Book not found"))
}

/// Book routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/books", get(list_books))
        .route("/books/popular", get(popular_books))
        .route("/books/{book_id}", get(get_book))
}
