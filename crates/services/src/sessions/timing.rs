use std::future::Future;
use std::time::Duration;

use crate::error::ApiError;

/// Periods and limits that drive a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTiming {
    /// Countdown resolution; each tick removes one second.
    pub tick_period: Duration,
    pub autosave_period: Duration,
    /// Below this many remaining seconds the session reports `low_time`.
    pub low_time_threshold_secs: u32,
    /// Upper bound for every backend call made by the session.
    pub request_timeout: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            autosave_period: Duration::from_secs(30),
            low_time_threshold_secs: 300,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl SessionTiming {
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Run a backend call, mapping an elapsed `limit` to `ApiError::Timeout`.
pub(crate) async fn bounded<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(ApiError::Timeout))
}
