use chrono::{DateTime, Utc};

/// Countdown label: `h:mm:ss` from one hour up, `m:ss` below.
#[must_use]
pub fn format_remaining(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

#[must_use]
pub fn format_saved_at(value: DateTime<Utc>) -> String {
    value.format("%H:%M:%S").to_string()
}
