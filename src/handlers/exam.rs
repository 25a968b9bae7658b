// src/handlers/exam.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{exam::CreateExamRequest, question::CreateQuestionRequest},
    services::{answer_key, exams},
    utils::{html::clean_html, jwt::Claims},
};

/// Creates an exam owned by the calling teacher and returns its join code.
pub async fn create_exam(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let teacher_id = claims.teacher_id()?;

    let title = clean_html(payload.title.trim());
    let exam = exams::create_exam(&pool, teacher_id, &title).await?;

    Ok((StatusCode::CREATED, Json(exam)))
}

/// Lists the calling teacher's exams.
pub async fn list_exams(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let exams = exams::list_for_teacher(&pool, claims.teacher_id()?).await?;
    Ok(Json(exams))
}

/// Appends a question to one of the caller's exams.
pub async fn add_question(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<i64>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    exams::find_owned(&pool, exam_id, claims.teacher_id()?).await?;

    let text = clean_html(&payload.text);
    let id = answer_key::add_question(
        &pool,
        exam_id,
        &text,
        payload.image.as_deref(),
        &payload.correct,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Questions of an exam as served to students. The answer key is not included.
pub async fn list_questions(
    State(pool): State<SqlitePool>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let questions = answer_key::list_public(&pool, exam_id).await?;
    Ok(Json(questions))
}
