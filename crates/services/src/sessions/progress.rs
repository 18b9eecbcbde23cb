/// Aggregated view of answering progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    pub flagged: usize,
}

impl SessionProgress {
    #[must_use]
    pub fn new(total: usize, answered: usize, flagged: usize) -> Self {
        Self {
            total,
            answered,
            unanswered: total.saturating_sub(answered),
            flagged,
        }
    }

    /// Share of answered questions, 0–100.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total as f64 * 100.0
    }
}
