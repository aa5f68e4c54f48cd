//! `Last ran:` run metadata in the footer

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::patterns::LAST_RAN;

/// When the changelog was last machine-updated.
///
/// A missing line, an empty token, or a token that is not a real instant all
/// yield `None`; callers fall back to their lookback window.
pub fn parse_last_ran(footer: &str) -> Option<DateTime<Utc>> {
    let caps = LAST_RAN.captures(footer)?;
    parse_timestamp(&caps["timestamp"])
}

/// Interpret an ISO-8601-like token as a UTC instant
pub fn parse_timestamp(token: &str) -> Option<DateTime<Utc>> {
    if token.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(token) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(token, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
