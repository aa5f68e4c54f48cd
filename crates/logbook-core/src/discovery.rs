//! Changelog discovery on disk

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::config::DiscoveryConfig;
use crate::error::{ConfigError, Result};

/// Finds changelog files below a repository root
#[derive(Debug, Clone)]
pub struct ChangelogDiscovery {
    root: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
}

impl ChangelogDiscovery {
    /// Build a discovery instance for `root` from the configured patterns
    pub fn new(root: impl Into<PathBuf>, config: &DiscoveryConfig) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            include: build_set(&config.include)?,
            exclude: build_set(&config.exclude)?,
        })
    }

    /// The root all patterns are relative to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the root and return matching changelog paths, sorted
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                let relative = relative_to(&self.root, entry.path());
                relative.as_os_str().is_empty() || !self.exclude.is_match(&relative)
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                std::io::Error::other(format!("failed to walk {}: {}", self.root.display(), e))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = relative_to(&self.root, entry.path());
            if self.include.is_match(&relative) {
                debug!(path = %relative.display(), "matched changelog");
                found.push(entry.into_path());
            }
        }

        found.sort();
        info!(count = found.len(), "discovered changelogs");
        Ok(found)
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        builder.add(glob);
    }

    Ok(builder.build().map_err(|e| ConfigError::InvalidPattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })?)
}

/// Express `path` relative to `root`; paths outside the root are returned unchanged
pub fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
