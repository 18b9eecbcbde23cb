use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use exam_core::model::{AnswerMap, SubmissionResult, Test, TestId};

use crate::error::ApiError;
use crate::provider::{ProgressSink, TestContentProvider};

#[derive(Default)]
struct BackendState {
    tests: HashMap<TestId, Test>,
    answer_keys: HashMap<TestId, AnswerMap>,
    saved: HashMap<TestId, AnswerMap>,
    submissions: Vec<(TestId, AnswerMap)>,
    save_calls: usize,
    submit_calls: usize,
    failing_saves: usize,
    failing_submits: usize,
    saved_answers_unavailable: bool,
}

/// In-process backend for tests, demos and offline runs.
///
/// Scores submissions against an optional answer key, one point per match.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<BackendState>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_test(&self, test: Test) {
        self.lock().tests.insert(test.id(), test);
    }

    pub fn set_answer_key(&self, test_id: TestId, key: AnswerMap) {
        self.lock().answer_keys.insert(test_id, key);
    }

    /// Pretend an earlier attempt saved `answers`.
    pub fn seed_saved_answers(&self, test_id: TestId, answers: AnswerMap) {
        self.lock().saved.insert(test_id, answers);
    }

    /// Make the next `count` saves fail.
    pub fn fail_next_saves(&self, count: usize) {
        self.lock().failing_saves = count;
    }

    /// Make the next `count` submissions fail.
    pub fn fail_next_submits(&self, count: usize) {
        self.lock().failing_submits = count;
    }

    pub fn set_saved_answers_unavailable(&self, unavailable: bool) {
        self.lock().saved_answers_unavailable = unavailable;
    }

    #[must_use]
    pub fn saved_answers(&self, test_id: TestId) -> Option<AnswerMap> {
        self.lock().saved.get(&test_id).cloned()
    }

    #[must_use]
    pub fn submissions(&self) -> Vec<(TestId, AnswerMap)> {
        self.lock().submissions.clone()
    }

    #[must_use]
    pub fn save_calls(&self) -> usize {
        self.lock().save_calls
    }

    #[must_use]
    pub fn submit_calls(&self) -> usize {
        self.lock().submit_calls
    }
}

#[async_trait]
impl TestContentProvider for InMemoryBackend {
    async fn fetch_test(&self, test_id: TestId) -> Result<Test, ApiError> {
        self.lock()
            .tests
            .get(&test_id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn fetch_saved_answers(&self, test_id: TestId) -> Result<AnswerMap, ApiError> {
        let guard = self.lock();
        if guard.saved_answers_unavailable {
            return Err(ApiError::Unavailable("saved answers".into()));
        }
        Ok(guard.saved.get(&test_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ProgressSink for InMemoryBackend {
    async fn save_progress(&self, test_id: TestId, answers: &AnswerMap) -> Result<(), ApiError> {
        let mut guard = self.lock();
        guard.save_calls += 1;
        if guard.failing_saves > 0 {
            guard.failing_saves -= 1;
            return Err(ApiError::Unavailable("save rejected".into()));
        }
        guard.saved.insert(test_id, answers.clone());
        Ok(())
    }

    async fn submit_test(
        &self,
        test_id: TestId,
        answers: &AnswerMap,
    ) -> Result<SubmissionResult, ApiError> {
        let mut guard = self.lock();
        guard.submit_calls += 1;
        if guard.failing_submits > 0 {
            guard.failing_submits -= 1;
            return Err(ApiError::Unavailable("submit rejected".into()));
        }
        let test = guard.tests.get(&test_id).ok_or(ApiError::NotFound)?;
        let max_score = test.question_count() as f64;

        let result = match guard.answer_keys.get(&test_id) {
            Some(key) => {
                let correct = key
                    .iter()
                    .filter(|(question, expected)| answers.get(*question) == Some(*expected))
                    .count();
                SubmissionResult::from_score(correct as f64, max_score)
            }
            None => SubmissionResult::pending(Some("Submitted for grading".into())),
        };

        guard.saved.remove(&test_id);
        guard.submissions.push((test_id, answers.clone()));
        Ok(result)
    }
}
