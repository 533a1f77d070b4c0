use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use super::{AttemptRepository, QuestionRepository};
use crate::dto::test_dto::{CreateQuestion, CreateTestPayload, TestFilter};
use crate::error::{Error, Result};
use crate::models::answer::{Answer, NewAnswer};
use crate::models::question::{AnswerValue, Question, QuestionType};
use crate::models::test::{Test, TestWithQuestions};
use crate::models::test_result::{TestResult, TestResultFilter};
use crate::services::scoring_service::ScoreTotals;

const QUESTION_COLUMNS: &str =
    "id, test_id, question_text, question_type, options, correct_answer, points, created_at";

#[derive(Debug, FromRow)]
struct QuestionRow {
    id: Uuid,
    test_id: Uuid,
    question_text: String,
    question_type: QuestionType,
    options: Option<Json<Vec<String>>>,
    correct_answer: Json<AnswerValue>,
    points: i32,
    created_at: DateTime<Utc>,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: row.id,
            test_id: row.test_id,
            question_text: row.question_text,
            question_type: row.question_type,
            options: row.options.map(|Json(options)| options),
            correct_answer: row.correct_answer.0,
            points: row.points,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct AnswerRow {
    id: Uuid,
    test_result_id: Uuid,
    question_id: Uuid,
    answer_content: Json<AnswerValue>,
    is_correct: bool,
    points_earned: i32,
    answered_at: DateTime<Utc>,
}

impl From<AnswerRow> for Answer {
    fn from(row: AnswerRow) -> Self {
        Self {
            id: row.id,
            test_result_id: row.test_result_id,
            question_id: row.question_id,
            answer_content: row.answer_content.0,
            is_correct: row.is_correct,
            points_earned: row.points_earned,
            answered_at: row.answered_at,
        }
    }
}

async fn insert_question_row(
    conn: &mut PgConnection,
    test_id: Uuid,
    question: &CreateQuestion,
) -> Result<Question> {
    let row = sqlx::query_as::<_, QuestionRow>(&format!(
        r#"
        INSERT INTO questions (test_id, question_text, question_type, options, correct_answer, points, position)
        VALUES (
            $1, $2, $3, $4, $5, $6,
            (SELECT COALESCE(MAX(position) + 1, 0) FROM questions WHERE test_id = $1)
        )
        RETURNING {}
        "#,
        QUESTION_COLUMNS
    ))
    .bind(test_id)
    .bind(&question.question_text)
    .bind(question.question_type)
    .bind(question.options.as_ref().map(Json))
    .bind(Json(&question.correct_answer))
    .bind(question.points)
    .fetch_one(conn)
    .await?;
    Ok(row.into())
}

#[derive(Clone)]
pub struct PgQuestionRepository {
    pool: PgPool,
}

impl PgQuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionRepository for PgQuestionRepository {
    async fn insert_test(
        &self,
        payload: &CreateTestPayload,
        creator_id: Uuid,
    ) -> Result<TestWithQuestions> {
        let mut tx = self.pool.begin().await?;

        let test = sqlx::query_as::<_, Test>(
            r#"
            INSERT INTO tests (title, description, time_limit_minutes, creator_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.time_limit_minutes)
        .bind(creator_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut questions = Vec::with_capacity(payload.questions.len());
        for question in &payload.questions {
            questions.push(insert_question_row(&mut *tx, test.id, question).await?);
        }

        tx.commit().await?;
        Ok(TestWithQuestions { test, questions })
    }

    async fn find_test(&self, test_id: Uuid) -> Result<Option<Test>> {
        let test = sqlx::query_as::<_, Test>(r#"SELECT * FROM tests WHERE id = $1"#)
            .bind(test_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(test)
    }

    async fn list_tests(&self, filter: &TestFilter) -> Result<Vec<Test>> {
        let rows = sqlx::query_as::<_, Test>(
            r#"
            SELECT * FROM tests
            WHERE ($1::boolean IS NULL OR is_active = $1)
              AND ($2::uuid IS NULL OR creator_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.is_active)
        .bind(filter.creator_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_test(&self, test_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<Uuid> =
            sqlx::query_scalar(r#"SELECT id FROM tests WHERE id = $1 FOR UPDATE"#)
                .bind(test_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(Error::TestNotFound(test_id));
        }

        let attempts: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM test_results WHERE test_id = $1"#)
                .bind(test_id)
                .fetch_one(&mut *tx)
                .await?;
        if attempts > 0 {
            return Err(Error::Conflict(format!(
                "Test {} has {} recorded attempts and cannot be deleted",
                test_id, attempts
            )));
        }

        sqlx::query(r#"DELETE FROM questions WHERE test_id = $1"#)
            .bind(test_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(r#"DELETE FROM tests WHERE id = $1"#)
            .bind(test_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn insert_question(&self, test_id: Uuid, question: &CreateQuestion) -> Result<Question> {
        let mut conn = self.pool.acquire().await?;
        insert_question_row(&mut *conn, test_id, question).await
    }

    async fn find_question(&self, question_id: Uuid) -> Result<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {} FROM questions WHERE id = $1",
            QUESTION_COLUMNS
        ))
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Question::from))
    }

    async fn questions_for_test(&self, test_id: Uuid) -> Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {} FROM questions WHERE test_id = $1 ORDER BY position, created_at",
            QUESTION_COLUMNS
        ))
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Question::from).collect())
    }
}

#[derive(Clone)]
pub struct PgAttemptRepository {
    pool: PgPool,
}

impl PgAttemptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttemptRepository for PgAttemptRepository {
    async fn insert_attempt(
        &self,
        test_id: Uuid,
        user_id: Uuid,
        started_at: DateTime<Utc>,
    ) -> Result<TestResult> {
        let attempt = sqlx::query_as::<_, TestResult>(
            r#"
            INSERT INTO test_results (test_id, user_id, score, max_score, started_at, completed_at)
            VALUES ($1, $2, NULL, NULL, $3, NULL)
            RETURNING *
            "#,
        )
        .bind(test_id)
        .bind(user_id)
        .bind(started_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(attempt)
    }

    async fn find_attempt(&self, attempt_id: Uuid) -> Result<Option<TestResult>> {
        let attempt = sqlx::query_as::<_, TestResult>(r#"SELECT * FROM test_results WHERE id = $1"#)
            .bind(attempt_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(attempt)
    }

    async fn list_attempts(&self, filter: &TestResultFilter) -> Result<Vec<TestResult>> {
        let rows = sqlx::query_as::<_, TestResult>(
            r#"
            SELECT * FROM test_results
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::uuid IS NULL OR test_id = $2)
            ORDER BY started_at DESC
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.test_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_answer(&self, answer: &NewAnswer) -> Result<Answer> {
        let row = sqlx::query_as::<_, AnswerRow>(
            r#"
            INSERT INTO answers (test_result_id, question_id, answer_content, is_correct, points_earned, answered_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(answer.test_result_id)
        .bind(answer.question_id)
        .bind(Json(&answer.answer_content))
        .bind(answer.is_correct)
        .bind(answer.points_earned)
        .bind(answer.answered_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn answers_for_attempt(&self, attempt_id: Uuid) -> Result<Vec<Answer>> {
        let rows = sqlx::query_as::<_, AnswerRow>(
            r#"SELECT * FROM answers WHERE test_result_id = $1 ORDER BY answered_at"#,
        )
        .bind(attempt_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Answer::from).collect())
    }

    async fn has_answer(&self, attempt_id: Uuid, question_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (SELECT 1 FROM answers WHERE test_result_id = $1 AND question_id = $2)"#,
        )
        .bind(attempt_id)
        .bind(question_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn record_completion(
        &self,
        attempt_id: Uuid,
        totals: ScoreTotals,
        completed_at: DateTime<Utc>,
    ) -> Result<TestResult> {
        sqlx::query_as::<_, TestResult>(
            r#"
            UPDATE test_results
            SET score = $2, max_score = $3, completed_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(attempt_id)
        .bind(totals.score)
        .bind(totals.max_score)
        .bind(completed_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::AttemptNotFound(attempt_id))
    }
}
