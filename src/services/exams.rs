// src/services/exams.rs

use rand::Rng;
use sqlx::SqlitePool;

use crate::{
    error::{AppError, is_unique_violation},
    models::exam::Exam,
};

const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const CODE_LENGTH: usize = 6;
const CODE_ATTEMPTS: usize = 5;

/// Random six-character, uppercase base-36 join code.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Creates an exam with a fresh join code, retrying on the rare collision.
pub async fn create_exam(pool: &SqlitePool, teacher_id: i64, title: &str) -> Result<Exam, AppError> {
    for _ in 0..CODE_ATTEMPTS {
        let code = generate_code();
        let inserted = sqlx::query_as::<_, Exam>(
            r#"
            INSERT INTO exams (teacher_id, title, code)
            VALUES (?, ?, ?)
            RETURNING id, teacher_id, title, code, created_at
            "#,
        )
        .bind(teacher_id)
        .bind(title)
        .bind(&code)
        .fetch_one(pool)
        .await;

        match inserted {
            Ok(exam) => {
                tracing::info!(exam_id = exam.id, teacher_id, "exam created");
                return Ok(exam);
            }
            Err(e) if is_unique_violation(&e) => {
                tracing::warn!("Join code collision on {}, regenerating", code);
            }
            Err(e) => {
                tracing::error!("Failed to create exam: {:?}", e);
                return Err(AppError::from(e));
            }
        }
    }

    Err(AppError::InternalServerError(
        "Could not allocate a unique join code".to_string(),
    ))
}

pub async fn list_for_teacher(pool: &SqlitePool, teacher_id: i64) -> Result<Vec<Exam>, AppError> {
    let exams = sqlx::query_as(
        r#"
        SELECT id, teacher_id, title, code, created_at
        FROM exams
        WHERE teacher_id = ?
        ORDER BY id
        "#,
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    Ok(exams)
}

/// Resolves a join code typed by a student. Surrounding whitespace is ignored.
pub async fn find_by_code(pool: &SqlitePool, code: &str) -> Result<Option<Exam>, AppError> {
    let exam = sqlx::query_as(
        "SELECT id, teacher_id, title, code, created_at FROM exams WHERE code = ?",
    )
    .bind(code.trim())
    .fetch_optional(pool)
    .await?;

    Ok(exam)
}

/// The exam, if it exists and belongs to `teacher_id`. Anything else is NotFound.
pub async fn find_owned<'e, E>(executor: E, exam_id: i64, teacher_id: i64) -> Result<Exam, AppError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query_as(
        r#"
        SELECT id, teacher_id, title, code, created_at
        FROM exams
        WHERE id = ? AND teacher_id = ?
        "#,
    )
    .bind(exam_id)
    .bind(teacher_id)
    .fetch_optional(executor)
    .await?
    .ok_or(AppError::NotFound("Exam not found".to_string()))
}
