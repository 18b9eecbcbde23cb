use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;

use exam_core::Clock;
use exam_core::model::{AnswerMap, QuestionId, SessionId, SubmissionResult, TestId};

use super::machine::{SaveTicket, SubmitTicket, TestSession, Tick};
use super::schedule::ScheduledTask;
use super::state::{SaveKind, SessionSnapshot, SessionState};
use super::timing::{SessionTiming, bounded};
use crate::error::{ApiError, SessionError};
use crate::provider::{ProgressSink, TestContentProvider};

#[derive(Default)]
struct Timers {
    clock: Option<ScheduledTask>,
    autosave: Option<ScheduledTask>,
}

struct Inner {
    session: Mutex<TestSession>,
    updates: watch::Sender<SessionSnapshot>,
    progress: Arc<dyn ProgressSink>,
    clock: Clock,
    timing: SessionTiming,
    timers: Mutex<Timers>,
}

/// Shared, cloneable handle to a running test session.
///
/// All mutations go through a short critical section on the session and
/// publish a fresh [`SessionSnapshot`] to subscribers. Backend calls are
/// made outside the lock.
#[derive(Clone)]
pub struct TestSessionHandle {
    inner: Arc<Inner>,
}

impl TestSessionHandle {
    pub(crate) fn new(
        test_id: TestId,
        progress: Arc<dyn ProgressSink>,
        clock: Clock,
        timing: SessionTiming,
    ) -> Self {
        let session = TestSession::new(test_id, timing.low_time_threshold_secs);
        let (updates, _) = watch::channel(session.snapshot());
        Self {
            inner: Arc::new(Inner {
                session: Mutex::new(session),
                updates,
                progress,
                clock,
                timing,
                timers: Mutex::new(Timers::default()),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TestSession> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_timers(&self) -> MutexGuard<'_, Timers> {
        self.inner
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn update<R>(&self, apply: impl FnOnce(&mut TestSession) -> R) -> R {
        let mut session = self.lock();
        let out = apply(&mut session);
        self.inner.updates.send_replace(session.snapshot());
        out
    }

    fn read<R>(&self, view: impl FnOnce(&TestSession) -> R) -> R {
        view(&self.lock())
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.read(TestSession::id)
    }

    #[must_use]
    pub fn test_id(&self) -> TestId {
        self.read(TestSession::test_id)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.read(TestSession::state)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.read(TestSession::snapshot)
    }

    /// Receive a snapshot after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.updates.subscribe()
    }

    pub fn set_answer(&self, question: QuestionId, option: impl Into<String>) -> bool {
        self.update(|session| session.set_answer(question, option))
    }

    pub fn next(&self) {
        self.update(TestSession::next);
    }

    pub fn previous(&self) {
        self.update(TestSession::previous);
    }

    pub fn go_to(&self, index: usize) {
        self.update(|session| session.go_to(index));
    }

    pub fn toggle_flag(&self, index: usize) -> Option<bool> {
        self.update(|session| session.toggle_flag(index))
    }

    pub fn clear_notice(&self) {
        self.update(TestSession::clear_notice);
    }

    /// Open the confirmation gate for a manual submit.
    pub fn request_manual_submit(&self) -> bool {
        self.update(TestSession::request_manual_submit)
    }

    pub fn cancel_submit(&self) {
        self.update(TestSession::cancel_submit);
    }

    /// Submit after the student confirmed.
    ///
    /// Returns `Ok(None)` when there was nothing to confirm or a submission
    /// is already underway.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submit` when the backend rejects the
    /// submission; the session is active again and may retry.
    pub async fn confirm_submit(&self) -> Result<Option<SubmissionResult>, SessionError> {
        let Some(ticket) = self.update(TestSession::confirm_submit) else {
            return Ok(None);
        };
        self.run_submit(ticket).await.map(Some)
    }

    /// Save the current answers now, outside the autosave schedule.
    ///
    /// Returns `Ok(false)` when another save is in flight or the session is
    /// not active.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Save` when the backend call fails.
    pub async fn save_now(&self) -> Result<bool, SessionError> {
        let Some(ticket) = self.update(|session| session.begin_save(SaveKind::Manual)) else {
            return Ok(false);
        };
        self.deliver_save(ticket)
            .await
            .map(|()| true)
            .map_err(SessionError::Save)
    }

    /// Stop the clock and autosave timers. Idempotent.
    pub fn dispose(&self) {
        let (clock, autosave) = {
            let mut timers = self.lock_timers();
            (timers.clock.take(), timers.autosave.take())
        };
        if clock.is_some() || autosave.is_some() {
            tracing::debug!(test_id = %self.test_id(), "Stopping session timers");
        }
        for task in [clock, autosave].into_iter().flatten() {
            task.cancel();
        }
    }

    /// Leave the test: stop timers and flush unsaved answers once.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Save` when the final flush fails.
    pub async fn close(&self) -> Result<(), SessionError> {
        self.dispose();
        let ticket = self.update(|session| {
            if session.is_dirty() {
                session.begin_save(SaveKind::Final)
            } else {
                None
            }
        });
        match ticket {
            Some(ticket) => self.deliver_save(ticket).await.map_err(SessionError::Save),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn timers_running(&self) -> bool {
        let timers = self.lock_timers();
        [&timers.clock, &timers.autosave]
            .into_iter()
            .flatten()
            .any(|task| !task.is_finished())
    }

    pub(crate) async fn load(&self, content: &dyn TestContentProvider) -> Result<(), SessionError> {
        if self.state() != SessionState::Loading {
            return Ok(());
        }
        let test_id = self.test_id();
        let limit = self.inner.timing.request_timeout;

        let test = match bounded(limit, content.fetch_test(test_id)).await {
            Ok(test) => test,
            Err(source) => {
                tracing::error!(%test_id, error = %source, "Failed to load test");
                self.update(|session| session.fail(source.to_string()));
                return Err(SessionError::Load { test_id, source });
            }
        };

        let saved = match bounded(limit, content.fetch_saved_answers(test_id)).await {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!(%test_id, error = %err, "Saved answers unavailable, starting fresh");
                AnswerMap::new()
            }
        };

        let dropped = self.update(|session| session.activate(test, saved));
        if !dropped.is_empty() {
            tracing::warn!(%test_id, ?dropped, "Ignoring saved answers for unknown questions");
        }

        let snapshot = self.snapshot();
        tracing::info!(
            %test_id,
            session_id = %snapshot.session_id,
            remaining_secs = snapshot.remaining_secs,
            restored = snapshot.answers.len(),
            "Test session started"
        );
        self.start_timers();
        Ok(())
    }

    fn start_timers(&self) {
        if self.state() != SessionState::Active {
            return;
        }
        let timing = &self.inner.timing;
        let mut timers = self.lock_timers();
        if timers.clock.is_none() {
            let weak = Arc::downgrade(&self.inner);
            timers.clock = Some(ScheduledTask::every(
                "session-clock",
                timing.tick_period,
                move || {
                    let handle = upgrade(&weak);
                    async move {
                        match handle {
                            Some(handle) => handle.clock_tick().await,
                            None => ControlFlow::Break(()),
                        }
                    }
                },
            ));
        }
        if timers.autosave.is_none() {
            let weak = Arc::downgrade(&self.inner);
            timers.autosave = Some(ScheduledTask::every(
                "session-autosave",
                timing.autosave_period,
                move || {
                    let handle = upgrade(&weak);
                    async move {
                        let Some(handle) = handle else {
                            return ControlFlow::Break(());
                        };
                        if handle.read(TestSession::is_terminal) {
                            return ControlFlow::Break(());
                        }
                        // Detached so a slow save never shifts the schedule.
                        tokio::spawn(async move {
                            handle.autosave_tick().await;
                        });
                        ControlFlow::Continue(())
                    }
                },
            ));
        }
    }

    /// One second of countdown. Triggers the automatic submission when the
    /// clock reaches zero.
    pub(crate) async fn clock_tick(&self) -> ControlFlow<()> {
        match self.update(TestSession::tick) {
            Tick::Running(_) => ControlFlow::Continue(()),
            Tick::Stopped => {
                if self.read(TestSession::clock_running) {
                    ControlFlow::Continue(())
                } else {
                    ControlFlow::Break(())
                }
            }
            Tick::Expired => {
                tracing::info!(test_id = %self.test_id(), "Time expired, submitting automatically");
                if let Some(ticket) = self.update(TestSession::begin_auto_submit) {
                    // Failure is already recorded on the session.
                    let _ = self.run_submit(ticket).await;
                }
                ControlFlow::Break(())
            }
        }
    }

    /// One autosave attempt. Returns whether a save was issued.
    pub(crate) async fn autosave_tick(&self) -> bool {
        let Some(ticket) = self.update(|session| session.begin_save(SaveKind::Auto)) else {
            return false;
        };
        // Autosave failures stay passive; the next period retries.
        let _ = self.deliver_save(ticket).await;
        true
    }

    async fn deliver_save(&self, ticket: SaveTicket) -> Result<(), ApiError> {
        let test_id = self.test_id();
        let outcome = bounded(
            self.inner.timing.request_timeout,
            self.inner.progress.save_progress(test_id, &ticket.answers),
        )
        .await;
        match &outcome {
            Ok(()) => tracing::debug!(
                %test_id,
                kind = ?ticket.kind,
                answered = ticket.answers.len(),
                "Progress saved"
            ),
            Err(err) => tracing::warn!(%test_id, kind = ?ticket.kind, error = %err, "Save failed"),
        }
        let at = self.inner.clock.now();
        let report = outcome.as_ref().map(|_| ()).map_err(ToString::to_string);
        self.update(|session| session.finish_save(&ticket, report, at));
        outcome
    }

    async fn run_submit(&self, ticket: SubmitTicket) -> Result<SubmissionResult, SessionError> {
        let test_id = self.test_id();
        tracing::info!(
            %test_id,
            mode = ?ticket.mode,
            answered = ticket.answers.len(),
            "Submitting test"
        );
        let outcome = bounded(
            self.inner.timing.request_timeout,
            self.inner.progress.submit_test(test_id, &ticket.answers),
        )
        .await;
        match outcome {
            Ok(result) => {
                tracing::info!(%test_id, percentage = result.percentage, "Test submitted");
                self.update(|session| session.finish_submit(Ok(result.clone())));
                self.dispose();
                Ok(result)
            }
            Err(err) => {
                tracing::error!(%test_id, error = %err, "Submission failed");
                self.update(|session| session.finish_submit(Err(err.to_string())));
                Err(SessionError::Submit(err))
            }
        }
    }
}

fn upgrade(weak: &Weak<Inner>) -> Option<TestSessionHandle> {
    weak.upgrade().map(|inner| TestSessionHandle { inner })
}

impl std::fmt::Debug for TestSessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.read(|session| {
            f.debug_struct("TestSessionHandle")
                .field("session_id", &session.id())
                .field("test_id", &session.test_id())
                .field("state", &session.state())
                .finish()
        })
    }
}
