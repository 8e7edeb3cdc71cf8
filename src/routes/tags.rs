use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::Tag;
use crate::store;

#[derive(Deserialize)]
pub struct TagBody {
    name: String,
}

#[derive(Deserialize)]
pub struct LinkTagsBody {
    tag_ids: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tags", get(list_tags))
        .route("/api/tags", post(create_tag))
        .route("/api/tags/link/{note_id}", post(link_tags))
}

async fn list_tags(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let tags: Vec<Tag> = sqlx::query_as("SELECT * FROM tags WHERE user_id = ? ORDER BY name ASC")
        .bind(&user.id)
        .fetch_all(&state.db)
        .await?;

    Ok(Json(
        json!({ "status": "success", "data": { "tags": tags } }),
    ))
}

async fn create_tag(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<TagBody>,
) -> Result<impl IntoResponse, AppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Tag name is required".to_string()));
    }
    if name.len() > 50 {
        return Err(AppError::Validation(
            "Tag name must be at most 50 characters".to_string(),
        ));
    }

    let tag = Tag::new(user.id, name);
    // unique(user_id, name) surfaces duplicates as a client error
    sqlx::query("INSERT INTO tags (id, user_id, name) VALUES (?, ?, ?)")
        .bind(&tag.id)
        .bind(&tag.user_id)
        .bind(&tag.name)
        .execute(&state.db)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "data": { "tag": tag } })),
    ))
}

/// Attach tags to a note, skipping pairs that already exist, and return
/// the note's full tag list.
async fn link_tags(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(note_id): Path<String>,
    Json(body): Json<LinkTagsBody>,
) -> Result<impl IntoResponse, AppError> {
    if body.tag_ids.is_empty() {
        return Err(AppError::Validation(
            "At least one tag id is required".to_string(),
        ));
    }

    let mut tx = state.db.begin().await?;

    let note: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM notes WHERE id = ? AND user_id = ?")
        .bind(&note_id)
        .bind(&user.id)
        .fetch_optional(&mut *tx)
        .await?;
    if note.is_none() {
        return Err(AppError::NotFound);
    }

    store::tags::link(&mut tx, &note_id, &body.tag_ids).await?;
    let tags = store::tags::for_note(&mut tx, &note_id).await?;
    tx.commit().await?;

    Ok(Json(
        json!({ "status": "success", "data": { "tags": tags } }),
    ))
}
