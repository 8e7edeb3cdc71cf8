use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::json;

use crate::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::store::{ListNotesParams, NewNote, NoteChanges, NoteFilter};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/notes", get(list_notes))
        .route("/api/notes", post(create_note))
        .route("/api/notes/{id}", get(get_note))
        .route("/api/notes/{id}", patch(update_note))
        .route("/api/notes/{id}", delete(delete_note))
}

async fn list_notes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<ListNotesParams>,
) -> Result<impl IntoResponse, AppError> {
    let filter = NoteFilter::from(params);
    let notes = state.notes.list(&user.id, &filter).await?;
    Ok(Json(
        json!({ "status": "success", "data": { "notes": notes } }),
    ))
}

async fn create_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<NewNote>,
) -> Result<impl IntoResponse, AppError> {
    let note = state.notes.create(&user.id, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "data": { "note": note } })),
    ))
}

async fn get_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let note = state.notes.get(&user.id, &id).await?;
    Ok(Json(
        json!({ "status": "success", "data": { "note": note } }),
    ))
}

async fn update_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<NoteChanges>,
) -> Result<impl IntoResponse, AppError> {
    let note = state.notes.update(&user.id, &id, body).await?;
    Ok(Json(
        json!({ "status": "success", "data": { "note": note } }),
    ))
}

async fn delete_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.notes.delete(&user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
