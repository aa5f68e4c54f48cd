//! Changelog generation

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, instrument, warn};

use crate::patterns::HEADING;
use crate::types::Changelog;

/// Render an updated document with a new change-set stamped with the current time
pub fn render(changelog: &Changelog, title: &str, changes: &[String]) -> String {
    render_at(changelog, title, changes, Utc::now())
}

/// Render an updated document with a new change-set, stamped with `now`.
///
/// The header is re-emitted untouched, the new change-set is placed above the
/// previous body, and the footer is replaced by a fresh `Last ran:` line.
/// Re-parsing the output yields the same header and directives, the new
/// change-set followed by the previous ones, and `now` truncated to
/// milliseconds. Blank changes are left out.
#[instrument(skip(changelog, changes), fields(change_count = changes.len()))]
pub fn render_at(
    changelog: &Changelog,
    title: &str,
    changes: &[String],
    now: DateTime<Utc>,
) -> String {
    if !HEADING.is_match(&format!("## {}\n", title)) {
        warn!(title, "change-set title will not parse back as a heading");
    }

    let mut output = String::new();

    if let Some(header) = &changelog.header_content {
        output.push_str(header);
        output.push_str("\n\n");
    }

    output.push_str("---\n\n");
    output.push_str(&format!("## {}\n", title));
    for change in changes.iter().map(|c| single_line(c)) {
        if change.is_empty() {
            continue;
        }
        output.push_str(&format!("* {}\n", change));
    }

    if !changelog.body_content.is_empty() {
        output.push('\n');
        output.push_str(&changelog.body_content);
        output.push('\n');
    }

    output.push_str("\n---\n\n");
    output.push_str(&format!("Last ran: {}\n", format_timestamp(now)));

    debug!(output_len = output.len(), "changelog rendered");
    output
}

/// Format an instant the way the `Last ran:` pattern reads it back
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A change must stay on one bullet line
fn single_line(change: &str) -> String {
    change.split_whitespace().collect::<Vec<_>>().join(" ")
}
