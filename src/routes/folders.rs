use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::Folder;

#[derive(Deserialize)]
pub struct FolderBody {
    name: Option<String>,
    color: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/folders", get(list_folders))
        .route("/api/folders", post(create_folder))
        .route("/api/folders/{id}", patch(update_folder))
        .route("/api/folders/{id}", delete(delete_folder))
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Folder name is required".to_string()));
    }
    if name.len() > 100 {
        return Err(AppError::Validation(
            "Folder name must be at most 100 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<(), AppError> {
    let hex = color.strip_prefix('#');
    let valid = matches!(hex, Some(h) if (h.len() == 6 || h.len() == 3)
        && h.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Err(AppError::Validation("Invalid hex color".to_string()));
    }
    Ok(())
}

async fn list_folders(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let folders: Vec<Folder> =
        sqlx::query_as("SELECT * FROM folders WHERE user_id = ? ORDER BY created_at DESC")
            .bind(&user.id)
            .fetch_all(&state.db)
            .await?;

    Ok(Json(
        json!({ "status": "success", "data": { "folders": folders } }),
    ))
}

async fn create_folder(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<FolderBody>,
) -> Result<impl IntoResponse, AppError> {
    let name = body.name.unwrap_or_default();
    validate_name(&name)?;
    if let Some(color) = body.color.as_deref() {
        validate_color(color)?;
    }

    let folder = Folder::new(user.id, name, body.color);
    sqlx::query("INSERT INTO folders (id, user_id, name, color, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&folder.id)
        .bind(&folder.user_id)
        .bind(&folder.name)
        .bind(&folder.color)
        .bind(&folder.created_at)
        .execute(&state.db)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "data": { "folder": folder } })),
    ))
}

async fn update_folder(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<FolderBody>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(name) = body.name.as_deref() {
        validate_name(name)?;
    }
    if let Some(color) = body.color.as_deref() {
        validate_color(color)?;
    }

    let folder: Option<Folder> = sqlx::query_as(
        r#"
        UPDATE folders
        SET name = COALESCE(?, name), color = COALESCE(?, color)
        WHERE id = ? AND user_id = ?
        RETURNING *
        "#,
    )
    .bind(&body.name)
    .bind(&body.color)
    .bind(&id)
    .bind(&user.id)
    .fetch_optional(&state.db)
    .await?;

    let Some(folder) = folder else {
        return Err(AppError::NotFound);
    };

    Ok(Json(
        json!({ "status": "success", "data": { "folder": folder } }),
    ))
}

/// Deleting a folder unfiles its notes (their folder reference is nulled
/// by the schema), it never deletes them.
async fn delete_folder(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM folders WHERE id = ? AND user_id = ?")
        .bind(&id)
        .bind(&user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
