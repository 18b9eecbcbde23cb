use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use exam_core::model::TestId;
use services::TestSessionService;

use crate::vm::CompletedTest;

pub trait UiApp: Send + Sync {
    fn test_sessions(&self) -> Arc<TestSessionService>;

    /// Test to open straight away, if one was given at launch.
    fn launch_test_id(&self) -> Option<TestId>;
}

#[derive(Clone)]
pub struct AppContext {
    test_sessions: Arc<TestSessionService>,
    launch_test_id: Option<TestId>,
    open_launch_test_once: Arc<AtomicBool>,
    flash: Arc<Mutex<Option<String>>>,
    last_result: Arc<Mutex<Option<CompletedTest>>>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let launch_test_id = app.launch_test_id();
        Self {
            test_sessions: app.test_sessions(),
            launch_test_id,
            open_launch_test_once: Arc::new(AtomicBool::new(launch_test_id.is_some())),
            flash: Arc::new(Mutex::new(None)),
            last_result: Arc::new(Mutex::new(None)),
        }
    }

    #[must_use]
    pub fn test_sessions(&self) -> Arc<TestSessionService> {
        Arc::clone(&self.test_sessions)
    }

    #[must_use]
    pub fn launch_test_id(&self) -> Option<TestId> {
        self.launch_test_id
    }

    /// The launch test, returned only on the first call.
    #[must_use]
    pub fn take_launch_test(&self) -> Option<TestId> {
        if self.open_launch_test_once.swap(false, Ordering::AcqRel) {
            self.launch_test_id
        } else {
            None
        }
    }

    /// Leave a one-time message for the next page.
    pub fn set_flash(&self, message: impl Into<String>) {
        *self.flash.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    #[must_use]
    pub fn take_flash(&self) -> Option<String> {
        self.flash
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn record_result(&self, completed: CompletedTest) {
        *self
            .last_result
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(completed);
    }

    #[must_use]
    pub fn last_result(&self) -> Option<CompletedTest> {
        self.last_result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
