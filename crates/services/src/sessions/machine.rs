use std::sync::Arc;

use chrono::{DateTime, Utc};

use exam_core::model::{AnswerMap, FlaggedSet, QuestionId, SessionId, SubmissionResult, Test, TestId};

use super::state::{SaveKind, SessionNotice, SessionSnapshot, SessionState, SubmitMode};

/// Outcome of a single clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The clock is not running in the current state.
    Stopped,
    /// One second elapsed; this many remain.
    Running(u32),
    /// The countdown just reached zero; the caller must auto-submit.
    Expired,
}

/// A save the caller must deliver to the backend.
#[derive(Debug, Clone)]
pub struct SaveTicket {
    pub kind: SaveKind,
    pub revision: u64,
    pub answers: AnswerMap,
}

/// A submission the caller must deliver to the backend.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub mode: SubmitMode,
    pub answers: AnswerMap,
}

/// Synchronous state machine for one attempt.
///
/// Does no I/O and owns no timers. Callers translate tickets into
/// backend calls and report the outcome back with `finish_*`.
#[derive(Debug)]
pub struct TestSession {
    id: SessionId,
    test_id: TestId,
    state: SessionState,
    test: Option<Arc<Test>>,
    answers: AnswerMap,
    flagged: FlaggedSet,
    cursor: usize,
    remaining_secs: u32,
    low_time_threshold_secs: u32,
    revision: u64,
    saved_revision: u64,
    save_in_flight: bool,
    confirmation_pending: bool,
    auto_submit_consumed: bool,
    last_saved_at: Option<DateTime<Utc>>,
    result: Option<SubmissionResult>,
    notice: Option<SessionNotice>,
}

impl TestSession {
    #[must_use]
    pub fn new(test_id: TestId, low_time_threshold_secs: u32) -> Self {
        Self {
            id: SessionId::random(),
            test_id,
            state: SessionState::Loading,
            test: None,
            answers: AnswerMap::new(),
            flagged: FlaggedSet::new(),
            cursor: 0,
            remaining_secs: 0,
            low_time_threshold_secs,
            revision: 0,
            saved_revision: 0,
            save_in_flight: false,
            confirmation_pending: false,
            auto_submit_consumed: false,
            last_saved_at: None,
            result: None,
            notice: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn test_id(&self) -> TestId {
        self.test_id
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn flagged(&self) -> &FlaggedSet {
        &self.flagged
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Move `Loading → Active` with the fetched test and any saved answers.
    ///
    /// Saved answers for questions outside the test are dropped and returned.
    /// Restored answers count as already saved.
    pub fn activate(&mut self, test: Test, mut saved: AnswerMap) -> Vec<QuestionId> {
        if self.state != SessionState::Loading {
            return Vec::new();
        }
        let dropped = saved.retain_known(&test);
        self.remaining_secs = test.duration_secs();
        self.test = Some(Arc::new(test));
        self.answers = saved;
        self.cursor = 0;
        self.state = SessionState::Active;
        dropped
    }

    /// Move `Loading → Failed`.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.state != SessionState::Loading {
            return;
        }
        self.state = SessionState::Failed;
        self.notice = Some(SessionNotice::LoadFailed {
            message: message.into(),
        });
    }

    /// Record `option` for `question`. Ignored unless the session is active
    /// and the question belongs to the test. Returns whether anything changed.
    pub fn set_answer(&mut self, question: QuestionId, option: impl Into<String>) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        let known = self
            .test
            .as_deref()
            .is_some_and(|test| test.contains_question(question));
        if !known {
            return false;
        }
        let changed = self.answers.set(question, option);
        if changed {
            self.revision += 1;
        }
        changed
    }

    fn can_navigate(&self) -> bool {
        matches!(self.state, SessionState::Active | SessionState::Submitting)
    }

    fn last_index(&self) -> usize {
        self.test
            .as_deref()
            .map_or(0, |test| test.question_count().saturating_sub(1))
    }

    pub fn next(&mut self) {
        if self.can_navigate() {
            self.cursor = (self.cursor + 1).min(self.last_index());
        }
    }

    pub fn previous(&mut self) {
        if self.can_navigate() {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    /// Jump to `index`, clamped to the question range.
    pub fn go_to(&mut self, index: usize) {
        if self.can_navigate() {
            self.cursor = index.min(self.last_index());
        }
    }

    /// Flip the review flag on `index`. Out-of-range indices are ignored.
    pub fn toggle_flag(&mut self, index: usize) -> Option<bool> {
        if !self.can_navigate() {
            return None;
        }
        let count = self.test.as_deref().map_or(0, Test::question_count);
        if index >= count {
            return None;
        }
        Some(self.flagged.toggle(index))
    }

    #[must_use]
    pub fn clock_running(&self) -> bool {
        matches!(self.state, SessionState::Active | SessionState::Submitting)
            && self.remaining_secs > 0
    }

    /// Advance the countdown by one second.
    ///
    /// `Expired` is reported at most once per session, and only when the
    /// session is still active so a manual submission already underway
    /// is left alone.
    pub fn tick(&mut self) -> Tick {
        if !self.clock_running() {
            return Tick::Stopped;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs > 0 {
            return Tick::Running(self.remaining_secs);
        }
        if self.auto_submit_consumed {
            return Tick::Stopped;
        }
        self.auto_submit_consumed = true;
        if self.state != SessionState::Active {
            return Tick::Stopped;
        }
        self.notice = Some(SessionNotice::TimeExpired);
        Tick::Expired
    }

    /// Claim the save slot. Returns `None` when not active, when a save is
    /// already in flight, or for an autosave with nothing answered yet.
    pub fn begin_save(&mut self, kind: SaveKind) -> Option<SaveTicket> {
        if self.state != SessionState::Active || self.save_in_flight {
            return None;
        }
        if kind == SaveKind::Auto && self.answers.is_empty() {
            return None;
        }
        self.save_in_flight = true;
        Some(SaveTicket {
            kind,
            revision: self.revision,
            answers: self.answers.clone(),
        })
    }

    /// Release the save slot and record the outcome.
    pub fn finish_save(
        &mut self,
        ticket: &SaveTicket,
        outcome: Result<(), String>,
        at: DateTime<Utc>,
    ) {
        self.save_in_flight = false;
        match outcome {
            Ok(()) => {
                self.saved_revision = self.saved_revision.max(ticket.revision);
                self.last_saved_at = Some(at);
                if ticket.kind == SaveKind::Manual {
                    self.notice = Some(SessionNotice::ProgressSaved);
                }
            }
            Err(message) => {
                self.notice = Some(SessionNotice::SaveFailed {
                    kind: ticket.kind,
                    message,
                });
            }
        }
    }

    /// Ask for confirmation before a manual submit.
    pub fn request_manual_submit(&mut self) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        self.confirmation_pending = true;
        true
    }

    pub fn cancel_submit(&mut self) {
        self.confirmation_pending = false;
    }

    /// Accept the pending confirmation and move `Active → Submitting`.
    pub fn confirm_submit(&mut self) -> Option<SubmitTicket> {
        if !self.confirmation_pending || self.state != SessionState::Active {
            return None;
        }
        self.confirmation_pending = false;
        self.state = SessionState::Submitting;
        Some(SubmitTicket {
            mode: SubmitMode::Manual,
            answers: self.answers.clone(),
        })
    }

    /// Move `Active → Submitting` without confirmation, for an expired clock.
    pub fn begin_auto_submit(&mut self) -> Option<SubmitTicket> {
        if self.state != SessionState::Active {
            return None;
        }
        self.confirmation_pending = false;
        self.state = SessionState::Submitting;
        Some(SubmitTicket {
            mode: SubmitMode::Automatic,
            answers: self.answers.clone(),
        })
    }

    /// Resolve the in-flight submission.
    pub fn finish_submit(&mut self, outcome: Result<SubmissionResult, String>) {
        if self.state != SessionState::Submitting {
            return;
        }
        match outcome {
            Ok(result) => {
                self.state = SessionState::Submitted;
                self.result = Some(result);
                self.notice = Some(SessionNotice::Submitted);
            }
            Err(message) => {
                self.state = SessionState::Active;
                self.notice = Some(SessionNotice::SubmitFailed { message });
            }
        }
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            test_id: self.test_id,
            state: self.state,
            test: self.test.clone(),
            answers: self.answers.clone(),
            flagged: self.flagged.clone(),
            cursor: self.cursor,
            remaining_secs: self.remaining_secs,
            low_time: self.test.is_some() && self.remaining_secs < self.low_time_threshold_secs,
            confirmation_pending: self.confirmation_pending,
            saving: self.save_in_flight,
            dirty: self.is_dirty(),
            last_saved_at: self.last_saved_at,
            result: self.result.clone(),
            notice: self.notice.clone(),
        }
    }
}
