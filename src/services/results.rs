// src/services/results.rs

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        attempt::AnswerRecord,
        result::{ResultRow, ResultsTable},
    },
    services::{answer_key, exams, scoring},
};

#[derive(sqlx::FromRow)]
struct AttemptIdentity {
    attempt_id: i64,
    name: String,
    email: String,
    class: String,
}

#[derive(sqlx::FromRow)]
struct AttemptAnswer {
    attempt_id: i64,
    question_id: i64,
    chosen: Option<String>,
}

/// Builds the results table of an exam for its owning teacher.
///
/// One row per attempt, ordered by ascending attempt id. Ownership is checked
/// before anything else is read; a foreign or missing exam is NotFound. All
/// reads share one transaction so the key, the attempts and the answers come
/// from the same database state. Nothing is cached.
pub async fn aggregate(
    pool: &SqlitePool,
    exam_id: i64,
    teacher_id: i64,
) -> Result<ResultsTable, AppError> {
    let mut tx = pool.begin().await?;

    let exam = exams::find_owned(&mut *tx, exam_id, teacher_id).await?;

    let key = answer_key::load(&mut *tx, exam_id).await?;
    let total = key.total();

    let attempts: Vec<AttemptIdentity> = sqlx::query_as(
        r#"
        SELECT a.id AS attempt_id, s.name, s.email, s.class
        FROM attempts a
        JOIN students s ON a.student_id = s.id
        WHERE a.exam_id = ?
        ORDER BY a.id
        "#,
    )
    .bind(exam_id)
    .fetch_all(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to load attempts: {:?}", e);
        AppError::from(e)
    })?;

    let answers: Vec<AttemptAnswer> = sqlx::query_as(
        r#"
        SELECT an.attempt_id, an.question_id, an.chosen
        FROM answers an
        JOIN attempts a ON an.attempt_id = a.id
        WHERE a.exam_id = ?
        ORDER BY an.attempt_id, an.question_id
        "#,
    )
    .bind(exam_id)
    .fetch_all(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to load answers: {:?}", e);
        AppError::from(e)
    })?;

    tx.commit().await?;

    let mut by_attempt: HashMap<i64, Vec<AnswerRecord>> = HashMap::new();
    for answer in answers {
        by_attempt
            .entry(answer.attempt_id)
            .or_default()
            .push(AnswerRecord {
                question_id: answer.question_id,
                chosen: answer.chosen,
            });
    }

    let rows: Vec<ResultRow> = attempts
        .into_iter()
        .map(|attempt| {
            let recorded = by_attempt
                .get(&attempt.attempt_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            ResultRow {
                attempt_id: attempt.attempt_id,
                name: attempt.name,
                email: attempt.email,
                class_name: attempt.class,
                score: scoring::score(recorded, &key, total),
            }
        })
        .collect();

    tracing::debug!(exam_id, rows = rows.len(), total, "results aggregated");
    Ok(ResultsTable { exam, rows })
}
