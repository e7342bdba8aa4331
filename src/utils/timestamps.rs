use chrono::{DateTime, Datelike, Local, Utc};

/// Format an ISO-8601 timestamp as local `YYYY-MM-DD HH:MM`.
///
/// Unparseable input is cut to its first 16 characters; empty stays empty.
pub fn format_timestamp(timestamp: &str) -> String {
    if timestamp.is_empty() {
        return String::new();
    }
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => parsed.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => timestamp.chars().take(16).collect(),
    }
}

/// Format timestamp with tiered display:
/// - Relative for <7 days: "2h ago", "3d ago"
/// - Absolute for ≥7 days: "Jan 15", "Dec 3, 2024"
pub fn format_relative_timestamp(timestamp: &str) -> String {
    format_relative_at(timestamp, &Utc::now())
}

pub(crate) fn format_relative_at(timestamp: &str, now: &DateTime<Utc>) -> String {
    let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) else {
        return format_timestamp(timestamp);
    };
    let parsed = parsed.with_timezone(&Utc);
    let duration = now.signed_duration_since(parsed);

    if duration.num_days() < 7 {
        format_relative(duration.num_seconds())
    } else {
        format_absolute(&parsed, now)
    }
}

fn format_relative(seconds: i64) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d ago", days)
    } else if hours > 0 {
        format!("{}h ago", hours)
    } else if minutes > 0 {
        format!("{}m ago", minutes)
    } else {
        "just now".to_string()
    }
}

fn format_absolute(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    if timestamp.year() == now.year() {
        // "Jan 15"
        timestamp.format("%b %-d").to_string()
    } else {
        // "Dec 3, 2024"
        timestamp.format("%b %-d, %Y").to_string()
    }
}
