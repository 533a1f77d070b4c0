#![allow(dead_code)]

use exam_backend::config::DuplicateAnswerPolicy;
use exam_backend::dto::test_dto::{CreateQuestion, CreateTestPayload};
use exam_backend::models::question::{AnswerValue, QuestionType};
use exam_backend::models::test::TestWithQuestions;
use exam_backend::AppState;
use uuid::Uuid;

pub fn state() -> AppState {
    AppState::in_memory(DuplicateAnswerPolicy::Allow)
}

pub fn choices(items: &[&str]) -> AnswerValue {
    AnswerValue::Choices(items.iter().map(|s| s.to_string()).collect())
}

pub fn multiple_choice(text: &str, options: &[&str], correct: &[&str], points: i32) -> CreateQuestion {
    CreateQuestion {
        question_text: text.to_string(),
        question_type: QuestionType::MultipleChoice,
        options: Some(options.iter().map(|s| s.to_string()).collect()),
        correct_answer: choices(correct),
        points,
    }
}

pub fn open_ended(text: &str, correct: &str, points: i32) -> CreateQuestion {
    CreateQuestion {
        question_text: text.to_string(),
        question_type: QuestionType::OpenEnded,
        options: None,
        correct_answer: AnswerValue::Text(correct.to_string()),
        points,
    }
}

pub fn payload(title: &str, questions: Vec<CreateQuestion>) -> CreateTestPayload {
    CreateTestPayload {
        title: title.to_string(),
        description: None,
        time_limit_minutes: Some(30),
        questions,
    }
}

/// A test worth 10 points: multiple choice (5), open ended (3), true/false (2).
pub async fn seed_ten_point_test(state: &AppState) -> TestWithQuestions {
    let questions = vec![
        multiple_choice("Pick A and C", &["A", "B", "C", "D"], &["A", "C"], 5),
        open_ended("Capital of France?", "Paris", 3),
        CreateQuestion {
            question_text: "The earth is flat".to_string(),
            question_type: QuestionType::TrueFalse,
            options: None,
            correct_answer: AnswerValue::Flag(false),
            points: 2,
        },
    ];
    state
        .question_service
        .create_test(payload("General knowledge", questions), Uuid::new_v4())
        .await
        .expect("seed test")
}
