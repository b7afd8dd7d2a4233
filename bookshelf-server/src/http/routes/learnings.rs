//! Learning endpoints: short notes a user keeps against a book

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{Learning, LearningRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, PathId};
use crate::http::server::AppState;
use crate::models::{non_blank, non_empty, IdInput, RecordId, ValidationError};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveLearningRequest {
    pub user_id: Option<IdInput>,
    pub book_id: Option<IdInput>,
    pub learning: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLearningRequest {
    pub id: Option<IdInput>,
    pub user_id: Option<IdInput>,
    pub book_id: Option<IdInput>,
    pub learning: Option<String>,
}

/// Query string of GET /learnings; ids arrive as text
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningsQuery {
    pub user_id: Option<String>,
    pub book_id: Option<String>,
}

/// A learning as echoed back after a write
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningEntry {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub learning: String,
}

impl From<Learning> for LearningEntry {
    fn from(l: Learning) -> Self {
        Self {
            id: l.id,
            user_id: l.user_id,
            book_id: l.book_id,
            learning: l.learning,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateLearningResponse {
    pub success: bool,
    pub message: String,
    pub data: LearningEntry,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteLearningResponse {
    pub message: String,
}

/// POST /save-learnings
async fn save_learning(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SaveLearningRequest>,
) -> Result<Json<LearningEntry>, ApiError> {
    let (Some(user_id), Some(book_id), Some(text)) = (
        non_blank(req.user_id),
        non_blank(req.book_id),
        non_empty(req.learning),
    ) else {
        return Err(ValidationError::MissingAny {
            message: "Missing fields",
        }
        .into());
    };
    let user_id = user_id.into_record_id("userId")?;
    let book_id = book_id.into_record_id("bookId")?;

    let learning = LearningRepo::new(&state.pool)
        .create(user_id, book_id, &text)
        .await?;

    tracing::info!(learning_id = learning.id, user_id = learning.user_id, "learning saved");
    Ok(Json(LearningEntry::from(learning)))
}

/// GET /learnings?userId=..&bookId=..
async fn list_learnings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LearningsQuery>,
) -> Result<Json<Vec<Learning>>, ApiError> {
    let (Some(user_id), Some(book_id)) = (non_empty(params.user_id), non_empty(params.book_id))
    else {
        return Err(ValidationError::MissingAny {
            message: "Missing userId or bookId parameters",
        }
        .into());
    };
    let user_id = RecordId::parse("userId", &user_id)?;
    let book_id = RecordId::parse("bookId", &book_id)?;

    let learnings = LearningRepo::new(&state.pool).list(user_id, book_id).await?;
    Ok(Json(learnings))
}

/// PUT /update-learning
///
/// The id must belong to the given user and book, otherwise 404.
async fn update_learning(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<UpdateLearningRequest>,
) -> Result<Json<UpdateLearningResponse>, ApiError> {
    let (Some(id), Some(user_id), Some(book_id), Some(text)) = (
        non_blank(req.id),
        non_blank(req.user_id),
        non_blank(req.book_id),
        non_empty(req.learning),
    ) else {
        return Err(ValidationError::MissingAny {
            message: "Missing required fields",
        }
        .into());
    };
    let id = id.into_record_id("id")?;
    let user_id = user_id.into_record_id("userId")?;
    let book_id = book_id.into_record_id("bookId")?;

    LearningRepo::new(&state.pool)
        .update(id, user_id, book_id, &text)
        .await?;

    Ok(Json(UpdateLearningResponse {
        success: true,
        message: "Learning updated successfully".to_owned(),
        data: LearningEntry {
            id: id.get(),
            user_id: user_id.get(),
            book_id: book_id.get(),
            learning: text,
        },
    }))
}

/// DELETE /learnings/{id}
async fn delete_learning(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
) -> Result<Json<DeleteLearningResponse>, ApiError> {
    if !LearningRepo::new(&state.pool).delete(id).await? {
        tracing::debug!(learning_id = id.get(), "no learning to delete");
    }

    Ok(Json(DeleteLearningResponse {
        message: "Learning deleted successfully".to_owned(),
    }))
}

/// Learning routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/save-learnings", post(save_learning))
        .route("/learnings", get(list_learnings))
        .route("/update-learning", put(update_learning))
        .route("/learnings/{id}", delete(delete_learning))
}
