use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::answer::Answer;

/// One user's pass through a test.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct TestResult {
    pub id: Uuid,
    pub test_id: Uuid,
    pub user_id: Uuid,
    pub score: Option<i32>,
    pub max_score: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TestResult {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResultWithAnswers {
    #[serde(flatten)]
    pub result: TestResult,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Default)]
pub struct TestResultFilter {
    pub user_id: Option<Uuid>,
    pub test_id: Option<Uuid>,
}
