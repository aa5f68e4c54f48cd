//! Reading and writing changelog files

use std::io::ErrorKind;
use std::path::Path;

use logbook_core::error::ChangelogError;
use tracing::{debug, instrument};

use crate::parser::parse;
use crate::types::Changelog;

/// Read and parse a changelog file
#[instrument(fields(path = %path.display()))]
pub fn read_changelog(path: &Path) -> Result<Changelog, ChangelogError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ChangelogError::FileNotFound(path.to_path_buf()),
        ErrorKind::InvalidData => ChangelogError::InvalidEncoding(path.to_path_buf()),
        _ => ChangelogError::Io(e),
    })?;

    let changelog = parse(&content);
    debug!(
        change_sets = changelog.change_sets.len(),
        last_ran = ?changelog.last_ran,
        "changelog read"
    );
    Ok(changelog)
}

/// Write rendered changelog text
#[instrument(skip(content), fields(path = %path.display(), len = content.len()))]
pub fn write_changelog(path: &Path, content: &str) -> Result<(), ChangelogError> {
    std::fs::write(path, content).map_err(|e| ChangelogError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
