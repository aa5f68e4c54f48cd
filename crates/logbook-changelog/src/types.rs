//! Changelog document types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A titled group of changes, e.g. everything recorded in week `2023.07`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Heading label
    pub title: String,
    /// One entry per bullet, in document order
    pub changes: Vec<String>,
}

impl ChangeSet {
    /// Create a new change-set
    pub fn new(title: impl Into<String>, changes: Vec<String>) -> Self {
        Self {
            title: title.into(),
            changes,
        }
    }

    /// Check if the change-set has no changes
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// A parsed changelog document
///
/// Built fresh by every parse and never mutated afterwards; rendering an
/// update produces new text instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changelog {
    /// Text before the first delimiter, carrying directives
    pub header_content: Option<String>,
    /// Narrative and change-set region
    pub body_content: String,
    /// Text after the last delimiter, carrying run metadata
    pub footer_content: Option<String>,
    /// Change-sets in heading order
    pub change_sets: Vec<ChangeSet>,
    /// Reviewers to request
    pub owner: Vec<String>,
    /// Assignees to notify
    pub notify: Vec<String>,
    /// When the document was last machine-updated
    pub last_ran: Option<DateTime<Utc>>,
}

impl Changelog {
    /// Parse changelog text
    pub fn parse(text: &str) -> Self {
        crate::parser::parse(text)
    }

    /// The newest change-set (the first one in the body)
    pub fn latest_change_set(&self) -> Option<&ChangeSet> {
        self.change_sets.first()
    }
}
