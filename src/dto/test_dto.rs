use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::question::{default_points, AnswerValue, QuestionType};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTestPayload {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Time limit must be at least one minute"))]
    pub time_limit_minutes: Option<i32>,
    #[validate(
        length(min = 1, message = "Test must have at least one question"),
        nested
    )]
    pub questions: Vec<CreateQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestion {
    #[validate(length(min = 1, message = "Question text cannot be empty"))]
    pub question_text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Option<Vec<String>>,
    pub correct_answer: AnswerValue,
    #[serde(default = "default_points")]
    #[validate(range(min = 0, max = 10000, message = "Points must be between 0 and 10000"))]
    pub points: i32,
}

impl CreateQuestion {
    /// Checks that the answer key has the shape the question type grades against.
    pub fn check_answer_key(&self) -> Result<()> {
        if !self.correct_answer.conforms_to(self.question_type) {
            return Err(Error::BadRequest(format!(
                "{} question expects {} as its correct answer, got {}",
                self.question_type,
                self.question_type.expected_shape(),
                self.correct_answer.shape()
            )));
        }
        if let (Some(options), Some(correct)) = (&self.options, self.correct_answer.choice_set()) {
            if let Some(missing) = correct.iter().find(|c| !options.iter().any(|o| o == *c)) {
                return Err(Error::BadRequest(format!(
                    "Correct answer '{}' is not one of the question options",
                    missing
                )));
            }
        }
        Ok(())
    }
}

impl CreateTestPayload {
    pub fn check_answer_keys(&self) -> Result<()> {
        self.questions.iter().try_for_each(CreateQuestion::check_answer_key)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestFilter {
    pub is_active: Option<bool>,
    pub creator_id: Option<uuid::Uuid>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl Default for TestFilter {
    fn default() -> Self {
        Self {
            is_active: None,
            creator_id: None,
            skip: 0,
            limit: default_limit(),
        }
    }
}

fn trim_optional_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::MAX_QUESTION_POINTS;
    use serde_json::json;

    fn mc_question() -> CreateQuestion {
        serde_json::from_value(json!({
            "question_text": "Pick the primes",
            "type": "multiple_choice",
            "options": ["2", "4", "5"],
            "correct_answer": ["2", "5"]
        }))
        .unwrap()
    }

    #[test]
    fn points_default_to_one() {
        assert_eq!(mc_question().points, 1);
    }

    #[test]
    fn test_without_questions_fails_validation() {
        let payload = CreateTestPayload {
            title: "Empty".into(),
            description: None,
            time_limit_minutes: None,
            questions: vec![],
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn negative_points_fail_nested_validation() {
        let mut question = mc_question();
        question.points = -1;
        let payload = CreateTestPayload {
            title: "Primes".into(),
            description: None,
            time_limit_minutes: Some(10),
            questions: vec![question],
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn points_above_the_cap_fail_validation() {
        let mut question = mc_question();
        question.points = MAX_QUESTION_POINTS;
        assert!(question.validate().is_ok());
        question.points = MAX_QUESTION_POINTS + 1;
        assert!(question.validate().is_err());
        question.points = i32::MAX;
        assert!(question.validate().is_err());
    }

    #[test]
    fn blank_description_is_dropped() {
        let payload: CreateTestPayload = serde_json::from_value(json!({
            "title": "Primes",
            "description": "   ",
            "time_limit_minutes": null,
            "questions": []
        }))
        .unwrap();
        assert_eq!(payload.description, None);
    }

    #[test]
    fn answer_key_must_match_type() {
        let mut question = mc_question();
        question.correct_answer = AnswerValue::Text("2".into());
        assert!(matches!(question.check_answer_key(), Err(Error::BadRequest(_))));
    }

    #[test]
    fn answer_key_must_be_among_options() {
        let mut question = mc_question();
        question.correct_answer = AnswerValue::Choices(vec!["2".into(), "7".into()]);
        let err = question.check_answer_key().unwrap_err();
        assert!(err.to_string().contains("'7'"));
        assert!(mc_question().check_answer_key().is_ok());
    }
}
