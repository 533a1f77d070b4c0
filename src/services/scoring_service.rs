use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::answer::Answer;
use crate::models::question::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreTotals {
    pub score: i32,
    pub max_score: i32,
}

impl ScoreTotals {
    /// `score` sums every recorded answer; `max_score` sums every question of
    /// the test, so unanswered questions count against the attempt.
    pub fn tally(answers: &[Answer], questions: &[Question]) -> Result<Self> {
        Ok(Self {
            score: checked_total(answers.iter().map(|a| a.points_earned), "score")?,
            max_score: checked_total(questions.iter().map(|q| q.points), "max score")?,
        })
    }
}

fn checked_total(mut points: impl Iterator<Item = i32>, what: &str) -> Result<i32> {
    points.try_fold(0i32, |total, p| {
        total
            .checked_add(p)
            .ok_or_else(|| Error::Internal(format!("Attempt {what} overflows")))
    })
}
