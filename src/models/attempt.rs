// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'attempts' table. One row per join action.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attempt {
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,

    /// Incremented each time the client reports leaving the exam tab.
    pub switch_count: i64,

    pub started_at: Option<chrono::DateTime<chrono::Utc>>,

    /// Never populated by the service; kept for schema compatibility.
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A recorded answer slot. At most one per (attempt, question).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct AnswerRecord {
    pub question_id: i64,
    pub chosen: Option<String>,
}

/// DTO for submitting or overwriting an answer.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub attempt_id: i64,
    pub qid: i64,
    #[validate(length(max = 50))]
    pub ans: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchResponse {
    pub attempt_id: i64,
    pub switch_count: i64,
}
