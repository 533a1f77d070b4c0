use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::question::AnswerValue;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Answer {
    pub id: Uuid,
    pub test_result_id: Uuid,
    pub question_id: Uuid,
    pub answer_content: AnswerValue,
    pub is_correct: bool,
    pub points_earned: i32,
    pub answered_at: DateTime<Utc>,
}

/// A graded submission ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnswer {
    pub test_result_id: Uuid,
    pub question_id: Uuid,
    pub answer_content: AnswerValue,
    pub is_correct: bool,
    pub points_earned: i32,
    pub answered_at: DateTime<Utc>,
}
