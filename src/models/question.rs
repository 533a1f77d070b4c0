use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: Uuid,
    pub test_id: Uuid,
    pub question_text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Option<Vec<String>>,
    pub correct_answer: AnswerValue,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

/// Upper bound on the points a single question may carry.
pub const MAX_QUESTION_POINTS: i32 = 10_000;

pub fn default_points() -> i32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "question_type", rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    Numeric,
    OpenEnded,
}

impl QuestionType {
    /// Human-readable description of the answer shape this type accepts.
    pub fn expected_shape(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "a list of option strings",
            QuestionType::TrueFalse => "a boolean",
            QuestionType::Numeric => "a number",
            QuestionType::OpenEnded => "a text string",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::Numeric => "numeric",
            QuestionType::OpenEnded => "open_ended",
        };
        f.write_str(tag)
    }
}

/// Answer payload, used both for a question's answer key and for submitted content.
///
/// Serialized untagged, so the JSON shape selects the variant: an array is a
/// set of choices, `true`/`false` a flag, a number a number and a string text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Choices(Vec<String>),
    Flag(bool),
    Number(Number),
    Text(String),
}

impl AnswerValue {
    pub fn conforms_to(&self, question_type: QuestionType) -> bool {
        matches!(
            (question_type, self),
            (QuestionType::MultipleChoice, AnswerValue::Choices(_))
                | (QuestionType::TrueFalse, AnswerValue::Flag(_))
                | (QuestionType::Numeric, AnswerValue::Number(_))
                | (QuestionType::OpenEnded, AnswerValue::Text(_))
        )
    }

    /// Selected options with order and repeats removed, if this is a choice set.
    pub fn choice_set(&self) -> Option<BTreeSet<&str>> {
        match self {
            AnswerValue::Choices(items) => Some(items.iter().map(String::as_str).collect()),
            _ => None,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            AnswerValue::Choices(_) => "a list",
            AnswerValue::Flag(_) => "a boolean",
            AnswerValue::Number(_) => "a number",
            AnswerValue::Text(_) => "a text string",
        }
    }
}
