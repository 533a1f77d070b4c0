pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dto::test_dto::{CreateQuestion, CreateTestPayload, TestFilter};
use crate::error::Result;
use crate::models::answer::{Answer, NewAnswer};
use crate::models::question::Question;
use crate::models::test::{Test, TestWithQuestions};
use crate::models::test_result::{TestResult, TestResultFilter};
use crate::services::scoring_service::ScoreTotals;

/// Tests and the questions that belong to them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Inserts the test and all of its questions as one unit of work.
    async fn insert_test(
        &self,
        payload: &CreateTestPayload,
        creator_id: Uuid,
    ) -> Result<TestWithQuestions>;
    async fn find_test(&self, test_id: Uuid) -> Result<Option<Test>>;
    async fn list_tests(&self, filter: &TestFilter) -> Result<Vec<Test>>;
    /// Deletes the questions of a test and then the test itself.
    ///
    /// Fails with `TestNotFound` when the test is absent and with `Conflict`
    /// when attempts have already been made against it.
    async fn delete_test(&self, test_id: Uuid) -> Result<()>;
    async fn insert_question(&self, test_id: Uuid, question: &CreateQuestion) -> Result<Question>;
    async fn find_question(&self, question_id: Uuid) -> Result<Option<Question>>;
    async fn questions_for_test(&self, test_id: Uuid) -> Result<Vec<Question>>;
}

/// Attempts (test results) and the answers recorded against them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    async fn insert_attempt(
        &self,
        test_id: Uuid,
        user_id: Uuid,
        started_at: DateTime<Utc>,
    ) -> Result<TestResult>;
    async fn find_attempt(&self, attempt_id: Uuid) -> Result<Option<TestResult>>;
    async fn list_attempts(&self, filter: &TestResultFilter) -> Result<Vec<TestResult>>;
    async fn insert_answer(&self, answer: &NewAnswer) -> Result<Answer>;
    async fn answers_for_attempt(&self, attempt_id: Uuid) -> Result<Vec<Answer>>;
    async fn has_answer(&self, attempt_id: Uuid, question_id: Uuid) -> Result<bool>;
    async fn record_completion(
        &self,
        attempt_id: Uuid,
        totals: ScoreTotals,
        completed_at: DateTime<Utc>,
    ) -> Result<TestResult>;
}
