// src/models/exam.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'exams' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Exam {
    pub id: i64,
    pub teacher_id: i64,
    pub title: String,

    /// Six-character join code handed out to students.
    pub code: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating an exam. The join code is generated server-side.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExamRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
}
