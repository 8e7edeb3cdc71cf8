use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use crate::AppState;
use crate::auth::{AuthUser, hash_password, login_user, logout_user, verify_password};
use crate::error::AppError;
use crate::models::User;

#[derive(Deserialize)]
pub struct SignupBody {
    username: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct LoginBody {
    email: String,
    password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

fn validate_signup(body: &SignupBody) -> Result<(), AppError> {
    if body.username.trim().len() < 3 {
        return Err(AppError::Validation(
            "Username must be at least 3 characters".to_string(),
        ));
    }
    if body.username.len() > 50 {
        return Err(AppError::Validation(
            "Username must be at most 50 characters".to_string(),
        ));
    }
    if !body.email.contains('@') || body.email.trim().is_empty() {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }
    if body.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SignupBody>,
) -> Result<impl IntoResponse, AppError> {
    validate_signup(&body)?;

    let existing: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE email = ?")
        .bind(&body.email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::AlreadyExists("Email already in use".to_string()));
    }

    let password_hash = hash_password(&body.password)?;
    let user = User::new(body.username, body.email, password_hash);

    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.created_at)
    .execute(&state.db)
    .await?;

    login_user(&session, &user).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "data": { "user": user } })),
    ))
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, AppError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&body.email)
        .fetch_optional(&state.db)
        .await?;

    // A single message for both the unknown-email and wrong-password
    // cases.
    let Some(user) = user else {
        return Err(AppError::Unauthorized("Invalid email or password"));
    };
    if !verify_password(&body.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid email or password"));
    }

    login_user(&session, &user).await?;

    Ok(Json(
        json!({ "status": "success", "data": { "user": user } }),
    ))
}

async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    logout_user(&session).await?;
    Ok(Json(json!({ "status": "success", "data": null })))
}

async fn me(AuthUser(user): AuthUser) -> Result<impl IntoResponse, AppError> {
    Ok(Json(
        json!({ "status": "success", "data": { "user": user } }),
    ))
}
