//! Remote operations

use std::path::Path;
use std::process::Command;

use tracing::{info, instrument};
use url::Url;

use logbook_core::error::GitError;
use logbook_core::RepoSlug;

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Get the URL for a remote
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(|s| s.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                Err(GitError::RemoteNotFound(name.to_string()))
            }
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Repository slug derived from a GitHub remote, if it is one
    pub fn remote_slug(&self, name: &str) -> Result<Option<RepoSlug>> {
        Ok(self
            .remote_url(name)?
            .as_deref()
            .and_then(slug_from_remote_url))
    }
}

/// Push `branch` and set its upstream using the git CLI, which picks up the
/// credential helpers configured for the repository.
#[instrument(fields(workdir = %workdir.display()))]
pub fn git_push_upstream(workdir: &Path, remote: &str, branch: &str) -> Result<()> {
    let start = std::time::Instant::now();
    let output = Command::new("git")
        .arg("-C")
        .arg(workdir)
        .args(["push", "--set-upstream", remote, branch])
        .output()
        .map_err(|e| GitError::PushFailed(format!("could not run git: {}", e)))?;

    info!(
        remote,
        branch,
        duration_ms = start.elapsed().as_millis(),
        success = output.status.success(),
        "git push (CLI)"
    );

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(GitError::PushFailed(format!(
            "{}/{}: {}",
            remote,
            branch,
            stderr.trim()
        )))
    }
}

/// Parse `owner/repo` out of a GitHub remote URL.
///
/// Accepts the scp-like SSH form (`git@github.com:owner/repo.git`) and URLs
/// (`https://github.com/owner/repo`, `ssh://git@github.com/owner/repo.git`).
pub fn slug_from_remote_url(remote: &str) -> Option<RepoSlug> {
    let remote = remote.trim();

    let path = if let Some(rest) = remote.strip_prefix("git@github.com:") {
        rest.to_string()
    } else {
        let url = Url::parse(remote).ok()?;
        if url.host_str() != Some("github.com") {
            return None;
        }
        url.path().trim_start_matches('/').to_string()
    };

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    path.parse().ok()
}
