//! CLI commands

mod inspect;
mod list;
mod notify;
mod update;

pub use inspect::InspectCommand;
pub use list::ListCommand;
pub use notify::NotifyCommand;
pub use update::UpdateCommand;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use logbook_core::config::{load_config_or_default, Config};
use logbook_core::{relative_to, ChangelogDiscovery, RepoSlug};
use logbook_git::GitRepo;

use crate::cli::Cli;

/// The repository a command operates on, with its configuration
pub(crate) struct Workspace {
    pub repo: GitRepo,
    pub root: PathBuf,
    pub config: Config,
}

impl Workspace {
    /// Open the repository containing the start directory and load its configuration
    pub fn open(cli: &Cli) -> anyhow::Result<Self> {
        let start = cli.start_dir()?;
        let repo = GitRepo::discover(&start)?;
        let root = repo.workdir()?.to_path_buf();

        let (config, config_path) = load_config_or_default(&root, &root)?;
        if let Some(path) = config_path {
            debug!(path = %path.display(), "loaded configuration");
        }

        Ok(Self { repo, root, config })
    }

    /// Changelog files under the root, sorted
    pub fn discover_changelogs(&self) -> anyhow::Result<Vec<PathBuf>> {
        let discovery = ChangelogDiscovery::new(&self.root, &self.config.discovery)?;
        Ok(discovery.discover()?)
    }

    /// Path of `path` relative to the root
    pub fn relative(&self, path: &Path) -> PathBuf {
        relative_to(&self.root, path)
    }

    /// Repository slug, from the first of: an explicit value, the
    /// configuration, the configured remote's URL.
    pub fn repo_slug(&self, explicit: Option<&str>) -> Option<RepoSlug> {
        let configured = explicit.or(self.config.github.repository.as_deref());
        if let Some(value) = configured {
            match value.parse() {
                Ok(slug) => return Some(slug),
                Err(e) => warn!(value, error = %e, "ignoring malformed repository"),
            }
        }

        match self.repo.remote_slug(&self.config.git.remote) {
            Ok(slug) => slug,
            Err(e) => {
                debug!(error = %e, "no repository slug from remote");
                None
            }
        }
    }
}

/// Directory of a root-relative changelog path as a `/`-separated string
pub(crate) fn display_directory(relative_changelog: &Path) -> String {
    relative_changelog
        .parent()
        .map(|dir| {
            dir.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}
