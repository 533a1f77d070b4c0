use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::DuplicateAnswerPolicy;
use crate::error::{Error, Result};
use crate::models::answer::{Answer, NewAnswer};
use crate::models::question::AnswerValue;
use crate::models::test_result::{TestResult, TestResultFilter, TestResultWithAnswers};
use crate::repositories::{AttemptRepository, QuestionRepository};
use crate::services::attempt_locks::AttemptLocks;
use crate::services::grading_service::GradingService;
use crate::services::scoring_service::ScoreTotals;
use crate::utils::time::now;

#[derive(Clone)]
pub struct AttemptService {
    attempts: Arc<dyn AttemptRepository>,
    questions: Arc<dyn QuestionRepository>,
    locks: AttemptLocks,
    duplicate_policy: DuplicateAnswerPolicy,
}

impl AttemptService {
    pub fn new(
        attempts: Arc<dyn AttemptRepository>,
        questions: Arc<dyn QuestionRepository>,
        duplicate_policy: DuplicateAnswerPolicy,
    ) -> Self {
        Self {
            attempts,
            questions,
            locks: AttemptLocks::new(),
            duplicate_policy,
        }
    }

    pub async fn start_attempt(&self, test_id: Uuid, user_id: Uuid) -> Result<TestResult> {
        if self.questions.find_test(test_id).await?.is_none() {
            return Err(Error::TestNotFound(test_id));
        }

        let attempt = self.attempts.insert_attempt(test_id, user_id, now()).await?;
        info!(attempt_id = %attempt.id, %test_id, %user_id, "Attempt started");
        Ok(attempt)
    }

    pub async fn submit_answer(
        &self,
        attempt_id: Uuid,
        question_id: Uuid,
        content: AnswerValue,
    ) -> Result<Answer> {
        let _guard = self.locks.acquire(attempt_id).await;

        let attempt = self.load_attempt(attempt_id).await?;
        let question = self
            .questions
            .find_question(question_id)
            .await?
            .ok_or(Error::QuestionNotFound(question_id))?;

        if question.test_id != attempt.test_id {
            warn!(%attempt_id, %question_id, "Answer submitted for a question of another test");
            return Err(Error::QuestionNotInTest {
                question_id,
                test_id: attempt.test_id,
            });
        }

        if self.duplicate_policy == DuplicateAnswerPolicy::Reject
            && self.attempts.has_answer(attempt_id, question_id).await?
        {
            warn!(%attempt_id, %question_id, "Duplicate answer rejected");
            return Err(Error::DuplicateAnswer {
                attempt_id,
                question_id,
            });
        }

        let grade = GradingService::evaluate(&question, &content)?;
        let answer = self
            .attempts
            .insert_answer(&NewAnswer {
                test_result_id: attempt_id,
                question_id,
                answer_content: content,
                is_correct: grade.is_correct,
                points_earned: grade.points_earned,
                answered_at: now(),
            })
            .await?;

        debug!(
            %attempt_id,
            %question_id,
            is_correct = grade.is_correct,
            points_earned = grade.points_earned,
            "Answer graded"
        );
        Ok(answer)
    }

    /// Recomputes the attempt's totals from its answers and marks it completed.
    ///
    /// Safe to call again: totals are rebuilt from scratch and overwritten.
    pub async fn complete_attempt(&self, attempt_id: Uuid) -> Result<TestResult> {
        let _guard = self.locks.acquire(attempt_id).await;

        let attempt = self.load_attempt(attempt_id).await?;
        let answers = self.attempts.answers_for_attempt(attempt_id).await?;
        let questions = self.questions.questions_for_test(attempt.test_id).await?;

        let totals = ScoreTotals::tally(&answers, &questions)?;
        if totals.score > totals.max_score {
            warn!(
                %attempt_id,
                score = totals.score,
                max_score = totals.max_score,
                "Score exceeds max score, attempt has repeated answers"
            );
        }

        let completed = self
            .attempts
            .record_completion(attempt_id, totals, now())
            .await?;

        info!(
            %attempt_id,
            score = totals.score,
            max_score = totals.max_score,
            answered = answers.len(),
            questions = questions.len(),
            "Attempt completed"
        );
        Ok(completed)
    }

    pub async fn get_attempt(&self, attempt_id: Uuid) -> Result<TestResultWithAnswers> {
        let result = self.load_attempt(attempt_id).await?;
        let answers = self.attempts.answers_for_attempt(attempt_id).await?;
        Ok(TestResultWithAnswers { result, answers })
    }

    pub async fn list_attempts(&self, filter: &TestResultFilter) -> Result<Vec<TestResult>> {
        self.attempts.list_attempts(filter).await
    }

    async fn load_attempt(&self, attempt_id: Uuid) -> Result<TestResult> {
        self.attempts
            .find_attempt(attempt_id)
            .await?
            .ok_or(Error::AttemptNotFound(attempt_id))
    }
}
