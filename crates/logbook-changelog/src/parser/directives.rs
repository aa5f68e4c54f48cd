//! Owner / notify directives in the header

use regex::Regex;

use crate::patterns::{NOTIFY_DIRECTIVE, OWNER_DIRECTIVE};

/// Reviewers listed on the `Owner:` line
pub fn parse_owner(header: &str) -> Vec<String> {
    parse_directive(&OWNER_DIRECTIVE, header)
}

/// Assignees listed on the `Notify:` line
pub fn parse_notify(header: &str) -> Vec<String> {
    parse_directive(&NOTIFY_DIRECTIVE, header)
}

fn parse_directive(pattern: &Regex, header: &str) -> Vec<String> {
    let Some(caps) = pattern.captures(header) else {
        return Vec::new();
    };

    caps["ids"]
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
