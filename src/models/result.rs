// src/models/result.rs

use serde::Serialize;

use crate::models::exam::Exam;

/// Output of the scoring engine for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub correct: i64,
    pub total: i64,
    pub percent: i64,
}

/// One derived results-table row. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub attempt_id: i64,
    pub name: String,
    pub email: String,
    pub class_name: String,
    pub score: ScoreSummary,
}

/// JSON shape of the results endpoint. `score` is the correct count.
#[derive(Debug, Serialize)]
pub struct ResultView {
    pub name: String,
    pub email: String,
    pub class: String,
    pub score: i64,
    pub total: i64,
    pub percent: i64,
}

impl From<&ResultRow> for ResultView {
    fn from(row: &ResultRow) -> Self {
        Self {
            name: row.name.clone(),
            email: row.email.clone(),
            class: row.class_name.clone(),
            score: row.score.correct,
            total: row.score.total,
            percent: row.score.percent,
        }
    }
}

/// The materialized results of one exam, shared by the JSON view and every export.
#[derive(Debug, Clone)]
pub struct ResultsTable {
    pub exam: Exam,
    pub rows: Vec<ResultRow>,
}
