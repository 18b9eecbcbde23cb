use std::sync::Arc;

use exam_core::Clock;
use exam_core::model::TestId;

use super::handle::TestSessionHandle;
use super::timing::SessionTiming;
use crate::error::SessionError;
use crate::provider::{ProgressSink, TestContentProvider};

/// Starts test-taking sessions against a backend.
#[derive(Clone)]
pub struct TestSessionService {
    clock: Clock,
    content: Arc<dyn TestContentProvider>,
    progress: Arc<dyn ProgressSink>,
    timing: SessionTiming,
}

impl TestSessionService {
    #[must_use]
    pub fn new(
        clock: Clock,
        content: Arc<dyn TestContentProvider>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            clock,
            content,
            progress,
            timing: SessionTiming::default(),
        }
    }

    #[must_use]
    pub fn with_timing(mut self, timing: SessionTiming) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn timing(&self) -> &SessionTiming {
        &self.timing
    }

    /// Create a session in `Loading` without contacting the backend.
    #[must_use]
    pub fn begin(&self, test_id: TestId) -> TestSessionHandle {
        TestSessionHandle::new(
            test_id,
            Arc::clone(&self.progress),
            self.clock,
            self.timing.clone(),
        )
    }

    /// Fetch the test and saved answers, then start the clock and autosave.
    ///
    /// A session that is no longer `Loading` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` if the test cannot be fetched; the
    /// session is then `Failed`.
    pub async fn load(&self, handle: &TestSessionHandle) -> Result<(), SessionError> {
        handle.load(self.content.as_ref()).await
    }

    /// `begin` followed by `load`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` if the test cannot be fetched.
    pub async fn open(&self, test_id: TestId) -> Result<TestSessionHandle, SessionError> {
        let handle = self.begin(test_id);
        self.load(&handle).await?;
        Ok(handle)
    }
}

impl std::fmt::Debug for TestSessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestSessionService")
            .field("clock", &self.clock)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}
