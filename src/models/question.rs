// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row of the 'questions' table as sent to students. The correct label is
/// never selected.
#[derive(Debug, Serialize, FromRow)]
pub struct PublicQuestion {
    pub id: i64,
    pub text: String,
    pub image: Option<String>,
}

/// DTO for adding a question to an exam.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
    #[validate(length(min = 1, max = 500))]
    pub image: Option<String>,
    /// Label of the correct choice, e.g. "A". Compared verbatim when scoring.
    #[validate(length(min = 1, max = 50))]
    pub correct: String,
}
