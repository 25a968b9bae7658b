// src/handlers/attempt.rs
//
// Student-facing endpoints. Students hold no credentials; an attempt id is
// their only handle.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        attempt::{SubmitAnswerRequest, SwitchResponse},
        student::{JoinRequest, JoinResponse},
    },
    services::{exams, ledger},
};

/// Joins an exam by code: resolves the student by email and opens an attempt.
///
/// An unknown code is a 404 and creates nothing.
pub async fn join(
    State(pool): State<SqlitePool>,
    Json(payload): Json<JoinRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let exam = exams::find_by_code(&pool, &payload.code)
        .await?
        .ok_or(AppError::NotFound("Exam code not found".to_string()))?;

    let student_id = ledger::resolve_student(
        &pool,
        payload.name.trim(),
        payload.email.trim(),
        payload.class_name.trim(),
    )
    .await?;

    let attempt_id = ledger::create_attempt(&pool, exam.id, student_id).await?;

    Ok(Json(JoinResponse {
        attempt_id,
        exam_id: exam.id,
    }))
}

/// Records or overwrites the answer for one question of an attempt.
pub async fn submit_answer(
    State(pool): State<SqlitePool>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    ledger::record_answer(&pool, payload.attempt_id, payload.qid, payload.ans.as_deref()).await?;

    Ok(StatusCode::OK)
}

pub async fn get_attempt(
    State(pool): State<SqlitePool>,
    Path(attempt_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(ledger::get_attempt(&pool, attempt_id).await?))
}

pub async fn list_answers(
    State(pool): State<SqlitePool>,
    Path(attempt_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    ledger::get_attempt(&pool, attempt_id).await?;
    Ok(Json(ledger::list_answers(&pool, attempt_id).await?))
}

/// Counts one switch away from the exam tab.
pub async fn record_switch(
    State(pool): State<SqlitePool>,
    Path(attempt_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let switch_count = ledger::record_tab_switch(&pool, attempt_id).await?;
    Ok(Json(SwitchResponse {
        attempt_id,
        switch_count,
    }))
}
