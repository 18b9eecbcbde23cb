mod handle;
mod machine;
mod progress;
mod schedule;
mod service;
mod state;
mod timing;

pub use crate::error::SessionError;
pub use handle::TestSessionHandle;
pub use machine::{SaveTicket, SubmitTicket, TestSession, Tick};
pub use progress::SessionProgress;
pub use schedule::ScheduledTask;
pub use service::TestSessionService;
pub use state::{SaveKind, SessionNotice, SessionSnapshot, SessionState, SubmitMode};
pub use timing::SessionTiming;
