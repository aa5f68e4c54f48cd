//! Changelog parsing
//!
//! Parsing is total: every input, including empty text, yields a
//! [`Changelog`]. Anything that does not match the grammar degrades to plain
//! body text, an empty directive list, or an absent timestamp.

mod change_sets;
mod directives;
mod run_metadata;
mod sections;

pub use change_sets::parse_change_sets;
pub use directives::{parse_notify, parse_owner};
pub use run_metadata::{parse_last_ran, parse_timestamp};
pub use sections::{split_sections, Sections};

use tracing::trace;

use crate::types::Changelog;

/// Parse changelog text into its structured form
pub fn parse(text: &str) -> Changelog {
    let sections = split_sections(text);

    let header_content = non_empty(sections.header);
    let body_content = sections.body.trim().to_string();
    let footer_content = non_empty(sections.footer);

    let (owner, notify) = match &header_content {
        Some(header) => (parse_owner(header), parse_notify(header)),
        None => (Vec::new(), Vec::new()),
    };
    let last_ran = footer_content.as_deref().and_then(parse_last_ran);
    let change_sets = parse_change_sets(&body_content);

    trace!(
        has_header = header_content.is_some(),
        has_footer = footer_content.is_some(),
        change_sets = change_sets.len(),
        "parsed changelog"
    );

    Changelog {
        header_content,
        body_content,
        footer_content,
        change_sets,
        owner,
        notify,
        last_ran,
    }
}

fn non_empty(segment: Option<&str>) -> Option<String> {
    segment
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
