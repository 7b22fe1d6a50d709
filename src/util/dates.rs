//! Human-facing date formatting for job cards and detail pages.

use time::{Duration, OffsetDateTime, format_description::FormatItem, macros::format_description};

pub const SHORT_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");

const UNAVAILABLE: &str = "Date not available";

/// `Dec 10, 2024`.
pub fn format_short_date(date: OffsetDateTime) -> String {
    date.format(SHORT_DATE_FORMAT)
        .unwrap_or_else(|_| date.date().to_string())
}

/// Full and relative labels for an optional timestamp, measured against `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateLabels {
    pub full: String,
    pub relative: String,
}

impl DateLabels {
    pub fn unavailable() -> Self {
        Self {
            full: UNAVAILABLE.to_string(),
            relative: UNAVAILABLE.to_string(),
        }
    }
}

pub fn date_labels(date: Option<OffsetDateTime>, now: OffsetDateTime) -> DateLabels {
    let Some(date) = date else {
        return DateLabels::unavailable();
    };
    let full = format_short_date(date);
    let relative = relative_time(now - date).unwrap_or_else(|| full.clone());
    DateLabels { full, relative }
}

/// `None` once the age reaches thirty days; callers show the full date instead.
fn relative_time(age: Duration) -> Option<String> {
    let seconds = age.whole_seconds();
    if seconds < 60 {
        return Some("just now".to_string());
    }
    let (count, unit) = if seconds < 3_600 {
        (age.whole_minutes(), "minute")
    } else if seconds < 86_400 {
        (age.whole_hours(), "hour")
    } else if age < Duration::days(30) {
        (age.whole_days(), "day")
    } else {
        return None;
    };
    let plural = if count == 1 { "" } else { "s" };
    Some(format!("{count} {unit}{plural} ago"))
}
