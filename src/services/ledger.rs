// src/services/ledger.rs

use sqlx::{Executor, Sqlite};

use crate::{
    error::{AppError, is_foreign_key_violation},
    models::attempt::{AnswerRecord, Attempt},
};

/// Finds the student by email, creating them on first join.
///
/// An existing record keeps the name and class it was created with.
pub async fn resolve_student<'e, E>(
    executor: E,
    name: &str,
    email: &str,
    class_name: &str,
) -> Result<i64, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    // The no-op update makes RETURNING yield the existing row on conflict.
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO students (name, email, class)
        VALUES (?, ?, ?)
        ON CONFLICT(email) DO UPDATE SET email = excluded.email
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(class_name)
    .fetch_one(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to resolve student: {:?}", e);
        AppError::from(e)
    })?;

    Ok(id)
}

/// Opens a new attempt. Never deduplicates: every call inserts a row.
pub async fn create_attempt<'e, E>(executor: E, exam_id: i64, student_id: i64) -> Result<i64, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO attempts (exam_id, student_id) VALUES (?, ?) RETURNING id",
    )
    .bind(exam_id)
    .bind(student_id)
    .fetch_one(executor)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            AppError::NotFound("Exam or student not found".to_string())
        } else {
            tracing::error!("Failed to create attempt: {:?}", e);
            AppError::from(e)
        }
    })?;

    tracing::info!(exam_id, student_id, attempt_id = id, "attempt created");
    Ok(id)
}

pub async fn get_attempt<'e, E>(executor: E, attempt_id: i64) -> Result<Attempt, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        r#"
        SELECT id, exam_id, student_id, switch_count, started_at, finished_at
        FROM attempts
        WHERE id = ?
        "#,
    )
    .bind(attempt_id)
    .fetch_optional(executor)
    .await?
    .ok_or(AppError::NotFound("Attempt not found".to_string()))
}

/// Records the chosen label for one (attempt, question) slot.
///
/// A single upsert statement: the first write inserts, later writes overwrite
/// `chosen` on the same row. Concurrent writers to one slot serialize in the
/// database and the last commit wins.
pub async fn record_answer<'e, E>(
    executor: E,
    attempt_id: i64,
    question_id: i64,
    chosen: Option<&str>,
) -> Result<(), AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO answers (attempt_id, question_id, chosen)
        VALUES (?, ?, ?)
        ON CONFLICT(attempt_id, question_id) DO UPDATE SET chosen = excluded.chosen
        "#,
    )
    .bind(attempt_id)
    .bind(question_id)
    .bind(chosen)
    .execute(executor)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            AppError::NotFound("Attempt or question not found".to_string())
        } else {
            tracing::error!("Failed to record answer: {:?}", e);
            AppError::from(e)
        }
    })?;

    Ok(())
}

pub async fn list_answers<'e, E>(executor: E, attempt_id: i64) -> Result<Vec<AnswerRecord>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let answers = sqlx::query_as(
        "SELECT question_id, chosen FROM answers WHERE attempt_id = ? ORDER BY question_id",
    )
    .bind(attempt_id)
    .fetch_all(executor)
    .await?;

    Ok(answers)
}

/// Bumps the tab-switch counter and returns the new value.
pub async fn record_tab_switch<'e, E>(executor: E, attempt_id: i64) -> Result<i64, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        "UPDATE attempts SET switch_count = switch_count + 1 WHERE id = ? RETURNING switch_count",
    )
    .bind(attempt_id)
    .fetch_optional(executor)
    .await?
    .ok_or(AppError::NotFound("Attempt not found".to_string()))
}
