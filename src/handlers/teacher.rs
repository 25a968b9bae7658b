// src/handlers/teacher.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::{AppError, is_unique_violation},
    models::teacher::{CredentialsRequest, Teacher},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Registers a new teacher account.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created with the new teacher ID.
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let hashed_password = hash_password(&payload.password)?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO teachers (username, password) VALUES (?, ?) RETURNING id",
    )
    .bind(&payload.username)
    .bind(&hashed_password)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("Username '{}' already exists", payload.username))
        } else {
            tracing::error!("Failed to register teacher: {:?}", e);
            AppError::from(e)
        }
    })?;

    tracing::info!(teacher_id = id, "teacher registered");
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Authenticates a teacher and returns a JWT.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let teacher: Teacher = sqlx::query_as(
        "SELECT id, username, password, created_at FROM teachers WHERE username = ?",
    )
    .bind(&payload.username)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::from(e)
    })?
    .ok_or(AppError::AuthError("Teacher not found".to_string()))?;

    if !verify_password(&payload.password, &teacher.password)? {
        return Err(AppError::AuthError("Invalid password".to_string()));
    }

    let token = sign_jwt(
        teacher.id,
        &teacher.username,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
    })))
}
