use async_trait::async_trait;

use exam_core::model::{AnswerMap, SubmissionResult, Test, TestId};

use crate::error::ApiError;

/// Source of test content and previously saved answers.
#[async_trait]
pub trait TestContentProvider: Send + Sync {
    /// Fetch the test definition.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound`, `ApiError::Unauthorized` or a transport error.
    async fn fetch_test(&self, test_id: TestId) -> Result<Test, ApiError>;

    /// Fetch answers saved by an earlier, interrupted attempt.
    ///
    /// Implementations return an empty map when nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the backend cannot be queried.
    async fn fetch_saved_answers(&self, test_id: TestId) -> Result<AnswerMap, ApiError>;
}

/// Destination for in-progress and final answers.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Persist the full current answer map.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects or never receives the save.
    async fn save_progress(&self, test_id: TestId, answers: &AnswerMap) -> Result<(), ApiError>;

    /// Submit the final answer map.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the submission was not accepted.
    async fn submit_test(
        &self,
        test_id: TestId,
        answers: &AnswerMap,
    ) -> Result<SubmissionResult, ApiError>;
}
