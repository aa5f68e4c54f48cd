//! Commit history operations

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use git2::{DiffOptions, Sort};
use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::CommitLog;

impl GitRepo {
    /// Commits reachable from HEAD, committed at or after `since`, that change
    /// anything under `dir` other than `excluded`.
    ///
    /// Both paths are relative to the working directory; an empty `dir`
    /// stands for the whole repository. Merge commits are skipped and each
    /// commit is compared against its first parent. Newest first.
    #[instrument(skip(self), fields(dir = %dir.display(), since = %since))]
    pub fn commits_touching(
        &self,
        dir: &Path,
        excluded: &Path,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitLog>> {
        let head = self.head_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head.id())?;

        let mut commits = Vec::new();
        let mut scanned = 0usize;

        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            scanned += 1;

            if commit.parent_count() > 1 {
                continue;
            }

            let timestamp = commit_time(&commit);
            if timestamp < since {
                continue;
            }

            if self.touches(&commit, dir, excluded)? {
                commits.push(CommitLog::new(
                    commit.id().to_string(),
                    commit.summary().unwrap_or_default(),
                    timestamp,
                ));
            }
        }

        debug!(scanned, matched = commits.len(), "walked history");
        Ok(commits)
    }

    fn touches(&self, commit: &git2::Commit<'_>, dir: &Path, excluded: &Path) -> Result<bool> {
        let tree = commit.tree()?;
        let parent_tree = match commit.parent_count() {
            0 => None,
            _ => Some(commit.parent(0)?.tree()?),
        };

        let mut opts = DiffOptions::new();
        let spec = pathspec(dir);
        if !spec.is_empty() {
            opts.pathspec(spec);
        }

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

        Ok(diff.deltas().any(|delta| {
            [delta.old_file().path(), delta.new_file().path()]
                .into_iter()
                .flatten()
                .any(|path| path.starts_with(dir) && path != excluded)
        }))
    }
}

fn commit_time(commit: &git2::Commit<'_>) -> DateTime<Utc> {
    Utc.timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now)
}

// git pathspecs always use forward slashes
fn pathspec(dir: &Path) -> String {
    dir.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{commit_file_at, init_repo};

    const DAY: i64 = 86_400;
    const START: i64 = 1_700_000_000;

    fn since(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).single().unwrap()
    }

    #[test]
    fn test_commits_touching_directory() {
        let (temp, repo) = init_repo();
        commit_file_at(&temp, &repo, "apps/web/CHANGELOG.md", "# Web\n", "Add changelog", START);
        commit_file_at(&temp, &repo, "apps/web/index.ts", "a", "Add index (#1)", START + DAY);
        commit_file_at(&temp, &repo, "apps/api/main.rs", "b", "Add api", START + 2 * DAY);
        commit_file_at(&temp, &repo, "apps/web/index.ts", "c", "Tweak index", START + 3 * DAY);

        let git_repo = GitRepo::open(temp.path()).unwrap();
        let commits = git_repo
            .commits_touching(
                Path::new("apps/web"),
                Path::new("apps/web/CHANGELOG.md"),
                since(START),
            )
            .unwrap();

        let titles: Vec<_> = commits.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Tweak index", "Add index (#1)"]);
    }

    #[test]
    fn test_commits_before_since_are_ignored() {
        let (temp, repo) = init_repo();
        commit_file_at(&temp, &repo, "svc/lib.rs", "a", "Old work", START);
        commit_file_at(&temp, &repo, "svc/lib.rs", "b", "New work", START + 10 * DAY);

        let git_repo = GitRepo::open(temp.path()).unwrap();
        let commits = git_repo
            .commits_touching(
                Path::new("svc"),
                Path::new("svc/CHANGELOG.md"),
                since(START + 5 * DAY),
            )
            .unwrap();

        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].title, "New work");
        assert_eq!(commits[0].timestamp, since(START + 10 * DAY));
    }

    #[test]
    fn test_sibling_with_common_prefix_is_not_matched() {
        let (temp, repo) = init_repo();
        commit_file_at(&temp, &repo, "web/a.txt", "a", "Web change", START);
        commit_file_at(&temp, &repo, "web-legacy/a.txt", "b", "Legacy change", START + DAY);

        let git_repo = GitRepo::open(temp.path()).unwrap();
        let commits = git_repo
            .commits_touching(Path::new("web"), Path::new("web/CHANGELOG.md"), since(START))
            .unwrap();

        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].title, "Web change");
    }

    #[test]
    fn test_changelog_only_commit_is_ignored() {
        let (temp, repo) = init_repo();
        commit_file_at(&temp, &repo, "lib/CHANGELOG.md", "x", "Update Changelog.", START);

        let git_repo = GitRepo::open(temp.path()).unwrap();
        let commits = git_repo
            .commits_touching(Path::new("lib"), Path::new("lib/CHANGELOG.md"), since(START))
            .unwrap();

        assert!(commits.is_empty());
    }

    #[test]
    fn test_pathspec_uses_forward_slashes() {
        assert_eq!(pathspec(Path::new("apps/web")), "apps/web");
        assert_eq!(pathspec(Path::new("")), "");
    }
}
