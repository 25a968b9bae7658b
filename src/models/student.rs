// src/models/student.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// DTO for a student joining an exam by code.
#[derive(Debug, Deserialize, Validate)]
pub struct JoinRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(rename = "class")]
    #[validate(length(min = 1, max = 50))]
    pub class_name: String,
    #[validate(length(min = 1, max = 16))]
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub attempt_id: i64,
    pub exam_id: i64,
}
