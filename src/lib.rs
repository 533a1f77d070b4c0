pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

use crate::config::DuplicateAnswerPolicy;
use crate::repositories::memory::InMemoryStore;
use crate::repositories::postgres::{PgAttemptRepository, PgQuestionRepository};
use crate::repositories::{AttemptRepository, QuestionRepository};
use crate::services::{attempt_service::AttemptService, question_service::QuestionService};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub question_service: QuestionService,
    pub attempt_service: AttemptService,
}

impl AppState {
    pub fn new(pool: PgPool, duplicate_policy: DuplicateAnswerPolicy) -> Self {
        Self::from_repositories(
            Arc::new(PgQuestionRepository::new(pool.clone())),
            Arc::new(PgAttemptRepository::new(pool)),
            duplicate_policy,
        )
    }

    pub fn in_memory(duplicate_policy: DuplicateAnswerPolicy) -> Self {
        let store = InMemoryStore::new();
        Self::from_repositories(
            Arc::new(store.clone()),
            Arc::new(store),
            duplicate_policy,
        )
    }

    pub fn from_repositories(
        questions: Arc<dyn QuestionRepository>,
        attempts: Arc<dyn AttemptRepository>,
        duplicate_policy: DuplicateAnswerPolicy,
    ) -> Self {
        let question_service = QuestionService::new(questions.clone());
        let attempt_service = AttemptService::new(attempts, questions, duplicate_policy);

        Self {
            question_service,
            attempt_service,
        }
    }
}
