// src/services/answer_key.rs

use std::collections::BTreeMap;

use sqlx::{Executor, Sqlite};

use crate::{
    error::{AppError, is_foreign_key_violation},
    models::question::PublicQuestion,
};

/// Correct labels for every question of one exam, ordered by question id, as
/// of the moment it was loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    correct: BTreeMap<i64, String>,
}

impl AnswerKey {
    pub fn new(correct: BTreeMap<i64, String>) -> Self {
        Self { correct }
    }

    pub fn correct_for(&self, question_id: i64) -> Option<&str> {
        self.correct.get(&question_id).map(String::as_str)
    }

    /// Current question count. Scoring always uses this, never a snapshot.
    pub fn total(&self) -> i64 {
        self.correct.len() as i64
    }
}

/// Loads the answer key of an exam. An unknown exam yields an empty key.
pub async fn load<'e, E>(executor: E, exam_id: i64) -> Result<AnswerKey, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let entries: Vec<(i64, String)> =
        sqlx::query_as("SELECT id, correct FROM questions WHERE exam_id = ? ORDER BY id")
            .bind(exam_id)
            .fetch_all(executor)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load answer key: {:?}", e);
                AppError::from(e)
            })?;

    Ok(AnswerKey::new(entries.into_iter().collect()))
}

/// Appends a question. Questions are never edited or removed.
pub async fn add_question<'e, E>(
    executor: E,
    exam_id: i64,
    text: &str,
    image: Option<&str>,
    correct: &str,
) -> Result<i64, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO questions (exam_id, text, image, correct) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(exam_id)
    .bind(text)
    .bind(image)
    .bind(correct)
    .fetch_one(executor)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            AppError::NotFound("Exam not found".to_string())
        } else {
            tracing::error!("Failed to create question: {:?}", e);
            AppError::from(e)
        }
    })?;

    tracing::debug!(exam_id, question_id = id, "question added");
    Ok(id)
}

/// Questions as shown to students, in creation order and without the key.
pub async fn list_public<'e, E>(executor: E, exam_id: i64) -> Result<Vec<PublicQuestion>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let questions =
        sqlx::query_as("SELECT id, text, image FROM questions WHERE exam_id = ? ORDER BY id")
            .bind(exam_id)
            .fetch_all(executor)
            .await?;

    Ok(questions)
}
