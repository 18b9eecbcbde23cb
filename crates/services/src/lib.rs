#![forbid(unsafe_code)]

pub mod api;
pub mod error;
pub mod in_memory;
pub mod provider;
pub mod sessions;

pub use exam_core::Clock;

pub use api::{ApiClient, ApiConfig};
pub use error::{ApiError, SessionError};
pub use in_memory::InMemoryBackend;
pub use provider::{ProgressSink, TestContentProvider};

pub use sessions::{
    SessionNotice, SessionProgress, SessionSnapshot, SessionState, SessionTiming, SubmitMode,
    TestSessionHandle, TestSessionService,
};
