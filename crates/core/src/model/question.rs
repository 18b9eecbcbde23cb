use thiserror::Error;

use crate::model::ids::QuestionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {0} has an empty prompt")]
    EmptyPrompt(QuestionId),

    #[error("question {0} has no options")]
    NoOptions(QuestionId),
}

/// A multiple-choice question as shown to the student.
///
/// Correct answers never reach the client; grading happens server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    image: Option<String>,
    options: Vec<String>,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt is blank or no options are given.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        image: Option<String>,
        options: Vec<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt(id));
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions(id));
        }
        let image = image.filter(|value| !value.trim().is_empty());

        Ok(Self {
            id,
            prompt,
            image,
            options,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }
}
