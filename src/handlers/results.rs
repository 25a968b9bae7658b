// src/handlers/results.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::result::ResultView,
    services::{export::ExportFormat, results},
    utils::jwt::Claims,
};

/// Per-student scores of an exam as JSON. Owner only.
pub async fn get_results(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let table = results::aggregate(&pool, exam_id, claims.teacher_id()?).await?;
    let view: Vec<ResultView> = table.rows.iter().map(ResultView::from).collect();
    Ok(Json(view))
}

/// Downloads the results as CSV, XLSX or PDF. Owner only.
///
/// Rows are fully aggregated before rendering starts.
pub async fn export_results(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path((exam_id, format)): Path<(i64, ExportFormat)>,
) -> Result<impl IntoResponse, AppError> {
    let table = results::aggregate(&pool, exam_id, claims.teacher_id()?).await?;

    let title = table.exam.title.clone();
    let rows = table.rows;
    let row_count = rows.len();
    let bytes = tokio::task::spawn_blocking(move || format.render(&title, &rows))
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))??;

    tracing::info!(exam_id, rows = row_count, format = format.extension(), "results exported");

    let disposition = format!(
        "attachment; filename=\"exam-{}-results.{}\"",
        exam_id,
        format.extension()
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
