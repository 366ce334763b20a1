use chrono::{DateTime, Local, Utc};

/// Format a row time relative to now:
/// - under a day: "just now", "12m ago", "3h ago"
/// - otherwise: short local date and time, "09/03/25 14:05"
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_timestamp_at(timestamp, &Utc::now())
}

pub(crate) fn format_timestamp_at(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(*timestamp).num_seconds();

    if seconds < 60 {
        // Includes small clock skew into the future
        "just now".to_string()
    } else if seconds < 60 * 60 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 24 * 60 * 60 {
        format!("{}h ago", seconds / 3600)
    } else {
        format_short(timestamp)
    }
}

fn format_short(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%m/%d/%y %H:%M").to_string()
}
