use exam_core::model::{Question, QuestionId};
use services::sessions::SaveKind;
use services::{SessionError, SessionNotice, SessionSnapshot, SessionState};

use crate::views::{ViewError, ViewState};
use crate::vm::time_fmt::{format_remaining, format_saved_at};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub id: QuestionId,
    pub index: usize,
    pub number_label: String,
    pub prompt: String,
    pub image: Option<String>,
    pub flagged: bool,
    pub options: Vec<OptionVm>,
}

impl QuestionVm {
    fn new(
        question: &Question,
        index: usize,
        total: usize,
        selected: Option<&str>,
        flagged: bool,
    ) -> Self {
        Self {
            id: question.id(),
            index,
            number_label: format!("Question {} of {total}", index + 1),
            prompt: question.prompt().to_string(),
            image: question.image().map(str::to_string),
            flagged,
            options: question
                .options()
                .iter()
                .map(|label| OptionVm {
                    label: label.clone(),
                    selected: selected == Some(label.as_str()),
                })
                .collect(),
        }
    }
}

/// One cell of the question navigator grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavCellVm {
    pub index: usize,
    pub current: bool,
    pub answered: bool,
    pub flagged: bool,
}

impl NavCellVm {
    #[must_use]
    pub fn number(&self) -> usize {
        self.index + 1
    }

    #[must_use]
    pub fn class(&self) -> String {
        let mut class = String::from("nav-cell");
        if self.current {
            class.push_str(" current");
        }
        if self.answered {
            class.push_str(" answered");
        }
        if self.flagged {
            class.push_str(" flagged");
        }
        class
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerTone {
    Info,
    Success,
    Warning,
    Error,
}

impl BannerTone {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Info => "banner info",
            Self::Success => "banner success",
            Self::Warning => "banner warning",
            Self::Error => "banner error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BannerVm {
    pub tone: BannerTone,
    pub text: String,
}

#[must_use]
pub fn banner_for_notice(notice: &SessionNotice) -> BannerVm {
    let (tone, text) = match notice {
        SessionNotice::ProgressSaved => (BannerTone::Success, "Progress saved.".to_string()),
        SessionNotice::SaveFailed {
            kind: SaveKind::Auto,
            ..
        } => (
            BannerTone::Info,
            "Autosave did not go through. Retrying shortly.".to_string(),
        ),
        SessionNotice::SaveFailed { message, .. } => (
            BannerTone::Warning,
            format!("Could not save progress: {message}"),
        ),
        SessionNotice::TimeExpired => (
            BannerTone::Warning,
            "Time is up. Submitting your answers...".to_string(),
        ),
        SessionNotice::Submitted => (BannerTone::Success, "Test submitted.".to_string()),
        SessionNotice::SubmitFailed { message } => (
            BannerTone::Error,
            format!("Submission failed: {message}. Please try again."),
        ),
        SessionNotice::LoadFailed { message } => (
            BannerTone::Error,
            format!("Could not load this test: {message}"),
        ),
    };
    BannerVm { tone, text }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmVm {
    pub answered: usize,
    pub unanswered: usize,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TakeTestVm {
    pub title: String,
    pub subject: String,
    pub timer_label: String,
    pub low_time: bool,
    pub progress_label: String,
    pub progress_percent: f64,
    pub question: Option<QuestionVm>,
    pub navigator: Vec<NavCellVm>,
    pub can_previous: bool,
    pub can_next: bool,
    pub editable: bool,
    pub submitting: bool,
    pub save_status: String,
    pub banner: Option<BannerVm>,
    pub confirm: Option<ConfirmVm>,
}

impl TakeTestVm {
    #[must_use]
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Option<Self> {
        let test = snapshot.test.as_deref()?;
        let total = test.question_count();
        let progress = snapshot.progress();

        let question = snapshot.current_question().map(|question| {
            QuestionVm::new(
                question,
                snapshot.cursor,
                total,
                snapshot.answers.get(question.id()),
                snapshot.flagged.contains(snapshot.cursor),
            )
        });

        let navigator = test
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| NavCellVm {
                index,
                current: index == snapshot.cursor,
                answered: snapshot.answers.contains(question.id()),
                flagged: snapshot.flagged.contains(index),
            })
            .collect();

        let submitting = snapshot.state == SessionState::Submitting;
        let save_status = if snapshot.saving {
            "Saving...".to_string()
        } else if let Some(at) = snapshot.last_saved_at {
            format!("Saved at {}", format_saved_at(at))
        } else if snapshot.dirty {
            "Unsaved changes".to_string()
        } else {
            String::new()
        };

        let confirm = snapshot.confirmation_pending.then(|| ConfirmVm {
            answered: progress.answered,
            unanswered: progress.unanswered,
            message: if progress.unanswered == 0 {
                "Submit your answers? You cannot change them afterwards.".to_string()
            } else {
                format!(
                    "You have {} unanswered question(s). Submit anyway?",
                    progress.unanswered
                )
            },
        });

        Some(Self {
            title: test.title().to_string(),
            subject: test.subject().to_string(),
            timer_label: format_remaining(snapshot.remaining_secs),
            low_time: snapshot.low_time,
            progress_label: format!("{} of {total} answered", progress.answered),
            progress_percent: progress.percent(),
            question,
            navigator,
            can_previous: snapshot.cursor > 0,
            can_next: !snapshot.is_last_question(),
            editable: snapshot.state == SessionState::Active,
            submitting,
            save_status,
            banner: snapshot.notice.as_ref().map(banner_for_notice),
            confirm,
        })
    }
}

/// Map a session snapshot to what the page should render.
#[must_use]
pub fn take_test_state(snapshot: &SessionSnapshot) -> ViewState<TakeTestVm> {
    match snapshot.state {
        SessionState::Loading => ViewState::Loading,
        SessionState::Failed => {
            let message = match &snapshot.notice {
                Some(SessionNotice::LoadFailed { message }) => message.clone(),
                _ => String::new(),
            };
            ViewState::Error(ViewError::TestUnavailable(message))
        }
        SessionState::Active | SessionState::Submitting | SessionState::Submitted => {
            TakeTestVm::from_snapshot(snapshot)
                .map_or(ViewState::Error(ViewError::Unknown), ViewState::Ready)
        }
    }
}

/// Message for the dashboard when the test could not be loaded.
#[must_use]
pub fn load_failure_flash(snapshot: &SessionSnapshot) -> Option<String> {
    if snapshot.state != SessionState::Failed {
        return None;
    }
    match take_test_state(snapshot) {
        ViewState::Error(err) => Some(err.message()),
        ViewState::Loading | ViewState::Ready(_) => None,
    }
}

/// Message for the dashboard after leaving with "Save & Exit".
#[must_use]
pub fn leave_flash(outcome: &Result<(), SessionError>) -> String {
    match outcome {
        Ok(()) => "Your progress has been saved. You can resume this test later.".to_string(),
        Err(err) => format!("Your latest answers could not be saved ({err}). Please try again."),
    }
}
