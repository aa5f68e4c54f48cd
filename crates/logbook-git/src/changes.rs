//! Files changed between two revisions

use std::ffi::OsStr;
use std::path::PathBuf;

use git2::{Delta, DiffFindOptions};
use tracing::{debug, instrument};

use logbook_core::error::GitError;

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Paths named `file_name` that were added, modified, copied or changed
    /// type on `head` since it forked from `base`.
    ///
    /// When the revisions share no history the diff is taken directly
    /// between them.
    #[instrument(skip(self))]
    pub fn changed_changelogs(&self, base: &str, head: &str, file_name: &str) -> Result<Vec<PathBuf>> {
        let base_commit = self.resolve_commit(base)?;
        let head_commit = self.resolve_commit(head)?;

        let fork_point = match self.repo.merge_base(base_commit.id(), head_commit.id()) {
            Ok(oid) => self.repo.find_commit(oid)?,
            Err(e) if e.code() == git2::ErrorCode::NotFound => base_commit,
            Err(e) => return Err(e.into()),
        };

        let old_tree = fork_point.tree()?;
        let new_tree = head_commit.tree()?;
        let mut diff = self
            .repo
            .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), None)?;
        diff.find_similar(Some(DiffFindOptions::new().copies(true)))?;

        let mut paths: Vec<PathBuf> = diff
            .deltas()
            .filter(|delta| {
                matches!(
                    delta.status(),
                    Delta::Added | Delta::Modified | Delta::Copied | Delta::Typechange
                )
            })
            .filter_map(|delta| delta.new_file().path().map(|p| p.to_path_buf()))
            .filter(|path| path.file_name() == Some(OsStr::new(file_name)))
            .collect();

        paths.sort();
        paths.dedup();
        debug!(count = paths.len(), "changed changelogs");
        Ok(paths)
    }

    fn resolve_commit(&self, rev: &str) -> Result<git2::Commit<'_>> {
        self.repo
            .revparse_single(rev)
            .and_then(|object| object.peel_to_commit())
            .map_err(|_| GitError::UnknownRevision(rev.to_string()))
    }
}
