use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::test_dto::{CreateQuestion, CreateTestPayload, TestFilter};
use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::test::{Test, TestWithQuestions};
use crate::repositories::QuestionRepository;

#[derive(Clone)]
pub struct QuestionService {
    repo: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    pub fn new(repo: Arc<dyn QuestionRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_test(
        &self,
        payload: CreateTestPayload,
        creator_id: Uuid,
    ) -> Result<TestWithQuestions> {
        payload.validate()?;
        payload.check_answer_keys()?;

        let created = self.repo.insert_test(&payload, creator_id).await?;
        info!(
            test_id = %created.test.id,
            %creator_id,
            questions = created.questions.len(),
            max_score = created.max_score(),
            "Test created"
        );
        Ok(created)
    }

    pub async fn get_test(&self, test_id: Uuid) -> Result<TestWithQuestions> {
        let test = self.load_test(test_id).await?;
        let questions = self.repo.questions_for_test(test_id).await?;
        Ok(TestWithQuestions { test, questions })
    }

    pub async fn list_tests(&self, filter: &TestFilter) -> Result<Vec<Test>> {
        if filter.skip < 0 || filter.limit < 0 {
            return Err(Error::BadRequest(
                "skip and limit must not be negative".to_string(),
            ));
        }
        self.repo.list_tests(filter).await
    }

    pub async fn add_question(&self, test_id: Uuid, question: CreateQuestion) -> Result<Question> {
        question.validate()?;
        question.check_answer_key()?;
        self.load_test(test_id).await?;

        let created = self.repo.insert_question(test_id, &question).await?;
        info!(%test_id, question_id = %created.id, points = created.points, "Question added");
        Ok(created)
    }

    pub async fn get_question(&self, question_id: Uuid) -> Result<Question> {
        self.repo
            .find_question(question_id)
            .await?
            .ok_or(Error::QuestionNotFound(question_id))
    }

    pub async fn list_questions(&self, test_id: Uuid) -> Result<Vec<Question>> {
        self.repo.questions_for_test(test_id).await
    }

    /// Removes a test together with its questions.
    pub async fn delete_test(&self, test_id: Uuid) -> Result<()> {
        self.repo.delete_test(test_id).await?;
        info!(%test_id, "Test deleted with its questions");
        Ok(())
    }

    async fn load_test(&self, test_id: Uuid) -> Result<Test> {
        self.repo
            .find_test(test_id)
            .await?
            .ok_or(Error::TestNotFound(test_id))
    }
}
