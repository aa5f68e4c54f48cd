//! Grammar of the changelog convention
//!
//! Every rule the parser and generator agree on lives here as a named pattern.

use regex::Regex;
use std::sync::LazyLock;

/// Marker whose presence on the right of a single delimiter identifies a footer
pub const RUN_METADATA_MARKER: &str = "Last ran:";

/// A line made of exactly three hyphens, optionally padded with blanks
pub static DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*---[ \t]*\r?$").expect("Invalid regex"));

/// `Owner: id, id` directive in the header
pub static OWNER_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bOwner:[ \t]*(?P<ids>[A-Za-z0-9_, \t-]*)").expect("Invalid regex")
});

/// `Notify: id, id` directive in the header
pub static NOTIFY_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bNotify:[ \t]*(?P<ids>[A-Za-z0-9_, \t-]*)").expect("Invalid regex")
});

/// `Last ran: <timestamp>` line in the footer
pub static LAST_RAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Last ran:[ \t]*(?P<timestamp>[0-9TZ:.\-]*)").expect("Invalid regex")
});

/// `## <label>` heading opening a change-set
pub static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*##[ \t]+(?P<title>[A-Za-z0-9.]+)[ \t]*(?:\r?\n|\z)")
        .expect("Invalid regex")
});

/// `* ` marker opening a change
pub static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\*[ \t]+").expect("Invalid regex"));

/// Blank line ending a change
pub static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\r?\n").expect("Invalid regex"));

/// Commit title ending in a pull request reference, e.g. `Fix login (#42)`
pub static PULL_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<title>.*)\(#(?P<number>\d+)\)$").expect("Invalid regex")
});
