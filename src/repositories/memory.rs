use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AttemptRepository, QuestionRepository};
use crate::dto::test_dto::{CreateQuestion, CreateTestPayload, TestFilter};
use crate::error::{Error, Result};
use crate::models::answer::{Answer, NewAnswer};
use crate::models::question::Question;
use crate::models::test::{Test, TestWithQuestions};
use crate::models::test_result::{TestResult, TestResultFilter};
use crate::services::scoring_service::ScoreTotals;
use crate::utils::time::now;

#[derive(Debug, Default)]
struct Tables {
    tests: Vec<Test>,
    questions: Vec<Question>,
    results: Vec<TestResult>,
    answers: Vec<Answer>,
}

impl Tables {
    fn push_question(&mut self, test_id: Uuid, question: &CreateQuestion) -> Question {
        let row = Question {
            id: Uuid::new_v4(),
            test_id,
            question_text: question.question_text.clone(),
            question_type: question.question_type,
            options: question.options.clone(),
            correct_answer: question.correct_answer.clone(),
            points: question.points,
            created_at: now(),
        };
        self.questions.push(row.clone());
        row
    }
}

/// Process-local store implementing both repositories over shared tables.
///
/// Rows are kept in insertion order, which doubles as question position.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryStore {
    async fn insert_test(
        &self,
        payload: &CreateTestPayload,
        creator_id: Uuid,
    ) -> Result<TestWithQuestions> {
        let mut tables = self.tables.write().await;
        let test = Test {
            id: Uuid::new_v4(),
            title: payload.title.clone(),
            description: payload.description.clone(),
            time_limit_minutes: payload.time_limit_minutes,
            creator_id,
            is_active: true,
            created_at: now(),
        };
        tables.tests.push(test.clone());
        let questions = payload
            .questions
            .iter()
            .map(|q| tables.push_question(test.id, q))
            .collect();
        Ok(TestWithQuestions { test, questions })
    }

    async fn find_test(&self, test_id: Uuid) -> Result<Option<Test>> {
        let tables = self.tables.read().await;
        Ok(tables.tests.iter().find(|t| t.id == test_id).cloned())
    }

    async fn list_tests(&self, filter: &TestFilter) -> Result<Vec<Test>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tests
            .iter()
            .rev()
            .filter(|t| filter.is_active.map_or(true, |active| t.is_active == active))
            .filter(|t| filter.creator_id.map_or(true, |creator| t.creator_id == creator))
            .skip(filter.skip.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn delete_test(&self, test_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.tests.iter().any(|t| t.id == test_id) {
            return Err(Error::TestNotFound(test_id));
        }
        let attempts = tables.results.iter().filter(|r| r.test_id == test_id).count();
        if attempts > 0 {
            return Err(Error::Conflict(format!(
                "Test {} has {} recorded attempts and cannot be deleted",
                test_id, attempts
            )));
        }
        tables.questions.retain(|q| q.test_id != test_id);
        tables.tests.retain(|t| t.id != test_id);
        Ok(())
    }

    async fn insert_question(&self, test_id: Uuid, question: &CreateQuestion) -> Result<Question> {
        let mut tables = self.tables.write().await;
        Ok(tables.push_question(test_id, question))
    }

    async fn find_question(&self, question_id: Uuid) -> Result<Option<Question>> {
        let tables = self.tables.read().await;
        Ok(tables.questions.iter().find(|q| q.id == question_id).cloned())
    }

    async fn questions_for_test(&self, test_id: Uuid) -> Result<Vec<Question>> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.test_id == test_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AttemptRepository for InMemoryStore {
    async fn insert_attempt(
        &self,
        test_id: Uuid,
        user_id: Uuid,
        started_at: DateTime<Utc>,
    ) -> Result<TestResult> {
        let mut tables = self.tables.write().await;
        let attempt = TestResult {
            id: Uuid::new_v4(),
            test_id,
            user_id,
            score: None,
            max_score: None,
            started_at,
            completed_at: None,
        };
        tables.results.push(attempt.clone());
        Ok(attempt)
    }

    async fn find_attempt(&self, attempt_id: Uuid) -> Result<Option<TestResult>> {
        let tables = self.tables.read().await;
        Ok(tables.results.iter().find(|r| r.id == attempt_id).cloned())
    }

    async fn list_attempts(&self, filter: &TestResultFilter) -> Result<Vec<TestResult>> {
        let tables = self.tables.read().await;
        Ok(tables
            .results
            .iter()
            .rev()
            .filter(|r| filter.user_id.map_or(true, |user| r.user_id == user))
            .filter(|r| filter.test_id.map_or(true, |test| r.test_id == test))
            .cloned()
            .collect())
    }

    async fn insert_answer(&self, answer: &NewAnswer) -> Result<Answer> {
        let mut tables = self.tables.write().await;
        let row = Answer {
            id: Uuid::new_v4(),
            test_result_id: answer.test_result_id,
            question_id: answer.question_id,
            answer_content: answer.answer_content.clone(),
            is_correct: answer.is_correct,
            points_earned: answer.points_earned,
            answered_at: answer.answered_at,
        };
        tables.answers.push(row.clone());
        Ok(row)
    }

    async fn answers_for_attempt(&self, attempt_id: Uuid) -> Result<Vec<Answer>> {
        let tables = self.tables.read().await;
        Ok(tables
            .answers
            .iter()
            .filter(|a| a.test_result_id == attempt_id)
            .cloned()
            .collect())
    }

    async fn has_answer(&self, attempt_id: Uuid, question_id: Uuid) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .answers
            .iter()
            .any(|a| a.test_result_id == attempt_id && a.question_id == question_id))
    }

    async fn record_completion(
        &self,
        attempt_id: Uuid,
        totals: ScoreTotals,
        completed_at: DateTime<Utc>,
    ) -> Result<TestResult> {
        let mut tables = self.tables.write().await;
        let attempt = tables
            .results
            .iter_mut()
            .find(|r| r.id == attempt_id)
            .ok_or(Error::AttemptNotFound(attempt_id))?;
        attempt.score = Some(totals.score);
        attempt.max_score = Some(totals.max_score);
        attempt.completed_at = Some(completed_at);
        Ok(attempt.clone())
    }
}
