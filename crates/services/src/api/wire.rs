//! JSON shapes exchanged with the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use exam_core::model::{
    AnswerMap, Grade, PASSING_PERCENTAGE, Question, QuestionId, SubmissionResult, Test, TestId,
    percentage,
};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub(crate) struct TestDto {
    id: u64,
    title: String,
    #[serde(default)]
    subject: String,
    duration: u32,
    questions: Vec<QuestionDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionDto {
    id: u64,
    question: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    options: Vec<String>,
}

impl TestDto {
    pub(crate) fn into_test(self) -> Result<Test, ApiError> {
        let questions = self
            .questions
            .into_iter()
            .map(|q| Question::new(QuestionId::new(q.id), q.question, q.image, q.options))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Test::new(
            TestId::new(self.id),
            self.title,
            self.subject,
            self.duration,
            questions,
        )?)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswersBody<'a> {
    pub(crate) answers: &'a AnswerMap,
}

/// Saved answers come back bare, wrapped in `{"answers": ...}`, or as `null`.
pub(crate) fn parse_saved_answers(body: &str) -> Result<AnswerMap, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(AnswerMap::default());
    }
    let value: Value = serde_json::from_str(body)?;
    let value = match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("answers") => {
            map.remove("answers").unwrap_or(Value::Null)
        }
        other => other,
    };
    if value.is_null() {
        return Ok(AnswerMap::default());
    }
    serde_json::from_value(value)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmissionDto {
    score: Option<f64>,
    max_score: Option<f64>,
    percentage: Option<f64>,
    grade: Option<String>,
    passed: Option<bool>,
    message: Option<String>,
}

impl SubmissionDto {
    pub(crate) fn into_result(self) -> SubmissionResult {
        let computed = match (self.score, self.max_score) {
            (Some(score), Some(max)) => Some(percentage(score, max)),
            _ => None,
        };
        let Some(pct) = self.percentage.or(computed) else {
            return SubmissionResult::pending(self.message);
        };

        let grade = self
            .grade
            .as_deref()
            .and_then(Grade::from_label)
            .unwrap_or_else(|| Grade::from_percentage(pct));

        SubmissionResult {
            score: self.score,
            max_score: self.max_score,
            percentage: pct,
            grade,
            passed: self.passed.unwrap_or(pct >= PASSING_PERCENTAGE),
            message: self.message,
        }
    }
}
