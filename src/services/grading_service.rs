use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::question::{AnswerValue, Question, QuestionType};

/// Outcome of grading one submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub is_correct: bool,
    pub points_earned: i32,
}

pub struct GradingService;

impl GradingService {
    /// Grades `submitted` against the question's answer key.
    ///
    /// Multiple-choice answers are compared as sets of options, everything
    /// else by exact value equality. There is no partial credit.
    pub fn evaluate(question: &Question, submitted: &AnswerValue) -> Result<Grade> {
        if !question.correct_answer.conforms_to(question.question_type) {
            return Err(Error::Internal(format!(
                "question {} stores {} as the answer key of a {} question",
                question.id,
                question.correct_answer.shape(),
                question.question_type
            )));
        }
        if !submitted.conforms_to(question.question_type) {
            return Err(Error::InvalidAnswer(format!(
                "{} question {} expects {}, got {}",
                question.question_type,
                question.id,
                question.question_type.expected_shape(),
                submitted.shape()
            )));
        }

        let is_correct = match question.question_type {
            QuestionType::MultipleChoice => {
                submitted.choice_set() == question.correct_answer.choice_set()
            }
            _ => *submitted == question.correct_answer,
        };

        Ok(Grade {
            is_correct,
            points_earned: if is_correct { question.points } else { 0 },
        })
    }
}
