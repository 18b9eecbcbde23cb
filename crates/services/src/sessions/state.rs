use std::sync::Arc;

use chrono::{DateTime, Utc};

use exam_core::model::{AnswerMap, FlaggedSet, Question, SessionId, SubmissionResult, Test, TestId};

use super::progress::SessionProgress;

/// Lifecycle of one attempt.
///
/// `Loading → Active → Submitting → Submitted`, `Loading → Failed`,
/// and `Submitting → Active` when a submission fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Loading,
    Active,
    Submitting,
    Submitted,
    Failed,
}

impl SessionState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Submitted | Self::Failed)
    }
}

/// How a submission was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// The student confirmed the submit prompt.
    Manual,
    /// The countdown reached zero.
    Automatic,
}

/// Why a save was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    /// Periodic save; failures are passive.
    Auto,
    /// The student pressed "Save Progress".
    Manual,
    /// Flush while leaving the test.
    Final,
}

/// Non-blocking message for the surrounding UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    ProgressSaved,
    SaveFailed { kind: SaveKind, message: String },
    TimeExpired,
    Submitted,
    SubmitFailed { message: String },
    LoadFailed { message: String },
}

/// Read-only view of a session at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub test_id: TestId,
    pub state: SessionState,
    pub test: Option<Arc<Test>>,
    pub answers: AnswerMap,
    pub flagged: FlaggedSet,
    pub cursor: usize,
    pub remaining_secs: u32,
    pub low_time: bool,
    pub confirmation_pending: bool,
    pub saving: bool,
    pub dirty: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub result: Option<SubmissionResult>,
    pub notice: Option<SessionNotice>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.test.as_deref().and_then(|test| test.question(self.cursor))
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.test.as_deref().map_or(0, Test::question_count);
        SessionProgress::new(total, self.answers.len(), self.flagged.len())
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.test
            .as_deref()
            .is_some_and(|test| self.cursor + 1 >= test.question_count())
    }
}
