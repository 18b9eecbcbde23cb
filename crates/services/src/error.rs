//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{QuestionError, TestError, TestId};

/// Failures of a call to the test backend.
///
/// At the session layer every variant simply means "the call did not succeed".
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("not authorized")]
    Unauthorized,
    #[error("request timed out")]
    Timeout,
    #[error("backend responded with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid base url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    InvalidTest(#[from] TestError),
    #[error(transparent)]
    InvalidQuestion(#[from] QuestionError),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by a test-taking session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The test could not be loaded; the session is unusable.
    #[error("failed to load test {test_id}: {source}")]
    Load {
        test_id: TestId,
        #[source]
        source: ApiError,
    },
    /// Saving progress failed; the next save attempt may succeed.
    #[error("failed to save progress: {0}")]
    Save(#[source] ApiError),
    /// Submission failed; the session is editable again and may retry.
    #[error("failed to submit test: {0}")]
    Submit(#[source] ApiError),
}

impl SessionError {
    /// Whether the user can meaningfully retry the failed operation.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Save(_) | Self::Submit(_))
    }
}
