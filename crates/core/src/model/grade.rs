use std::fmt;

use serde::{Deserialize, Serialize};

/// Percentage at or above which an attempt counts as passed.
pub const PASSING_PERCENTAGE: f64 = 60.0;

/// Letter grade bucket derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Self::A
        } else if percentage >= 80.0 {
            Self::B
        } else if percentage >= 70.0 {
            Self::C
        } else if percentage >= PASSING_PERCENTAGE {
            Self::D
        } else {
            Self::F
        }
    }

    /// Parses a single-letter grade label, case-insensitively.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "F" => Some(Self::F),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome reported by the backend after a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub score: Option<f64>,
    pub max_score: Option<f64>,
    pub percentage: f64,
    pub grade: Grade,
    pub passed: bool,
    pub message: Option<String>,
}

impl SubmissionResult {
    /// Build a result from a raw score; percentage is 0 when `max_score` is not positive.
    #[must_use]
    pub fn from_score(score: f64, max_score: f64) -> Self {
        let percentage = percentage(score, max_score);
        Self {
            score: Some(score),
            max_score: Some(max_score),
            percentage,
            grade: Grade::from_percentage(percentage),
            passed: percentage >= PASSING_PERCENTAGE,
            message: None,
        }
    }

    /// Result for a backend that acknowledged the submission without a score yet.
    #[must_use]
    pub fn pending(message: Option<String>) -> Self {
        Self {
            score: None,
            max_score: None,
            percentage: 0.0,
            grade: Grade::F,
            passed: false,
            message,
        }
    }

    #[must_use]
    pub fn is_scored(&self) -> bool {
        self.score.is_some() && self.max_score.is_some()
    }
}

#[must_use]
pub fn percentage(score: f64, max_score: f64) -> f64 {
    if max_score > 0.0 {
        score / max_score * 100.0
    } else {
        0.0
    }
}
