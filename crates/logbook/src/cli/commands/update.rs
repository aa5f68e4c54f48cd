//! Update command

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use serde::Serialize;
use tracing::{error, info, instrument};

use logbook_changelog::{change_lines, read_changelog, render_at, write_changelog, YearWeek};
use logbook_core::RepoSlug;
use logbook_delivery::{GitHubClient, PullRequestProposal};
use logbook_git::git_push_upstream;

use super::{display_directory, Workspace};
use crate::cli::output::{self, path_style};
use crate::cli::{Cli, OutputFormat};

/// Add a change-set to every changelog with new commits
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Print the updated documents instead of writing them
    #[arg(long, conflicts_with = "local")]
    pub dry_run: bool,

    /// Write the updated documents in place without opening pull requests
    #[arg(long)]
    pub local: bool,

    /// Collect commits since this instant instead of each changelog's last run
    #[arg(long, value_name = "RFC3339")]
    pub since: Option<DateTime<Utc>>,

    /// GitHub token used to open pull requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Repository as owner/name (defaults to configuration, then the remote URL)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,
}

/// Where updated documents go
enum Delivery {
    Print,
    Write,
    PullRequest {
        client: GitHubClient,
        return_to: String,
    },
}

/// What happened to one changelog
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Outcome {
    Skipped,
    Printed { document: String },
    Written,
    PullRequest { url: String },
    Failed { error: String },
}

#[derive(Debug, Serialize)]
struct UpdateReport {
    changelog: String,
    commits: usize,
    #[serde(flatten)]
    outcome: Outcome,
}

impl UpdateCommand {
    /// Execute the update command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            dry_run = self.dry_run,
            local = self.local,
            since = ?self.since,
            "executing update command"
        );
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        let workspace = Workspace::open(cli)?;
        let changelogs = workspace.discover_changelogs()?;
        info!(count = changelogs.len(), "found changelogs");

        let delivery = self.delivery(&workspace)?;
        let slug = workspace.repo_slug(self.repository.as_deref());
        let now = Utc::now();

        let mut reports = Vec::with_capacity(changelogs.len());
        for path in &changelogs {
            let report = match self
                .update_changelog(&workspace, &delivery, path, slug.as_ref(), now)
                .await
            {
                Ok(report) => report,
                Err(e) => {
                    let relative = workspace.relative(path);
                    error!(changelog = %relative.display(), error = %e, "failed to update changelog");
                    UpdateReport {
                        changelog: relative.display().to_string(),
                        commits: 0,
                        outcome: Outcome::Failed {
                            error: format!("{:#}", e),
                        },
                    }
                }
            };
            reports.push(report);
        }

        print_reports(cli, &reports)?;

        let failed = reports
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Failed { .. }))
            .count();
        if failed > 0 {
            anyhow::bail!("{} of {} changelogs failed to update", failed, reports.len());
        }

        Ok(())
    }

    fn delivery(&self, workspace: &Workspace) -> anyhow::Result<Delivery> {
        if self.dry_run {
            return Ok(Delivery::Print);
        }
        if self.local {
            return Ok(Delivery::Write);
        }

        let token = self
            .github_token
            .as_deref()
            .context("GITHUB_TOKEN is required to open pull requests (use --local or --dry-run otherwise)")?;
        let slug = workspace
            .repo_slug(self.repository.as_deref())
            .context("could not determine the GitHub repository; set GITHUB_REPOSITORY or github.repository")?;

        if !workspace.repo.is_clean()? {
            anyhow::bail!("the working tree has uncommitted changes");
        }

        let return_to = workspace
            .repo
            .current_branch()?
            .unwrap_or_else(|| workspace.config.git.base_branch.clone());
        let client = GitHubClient::new(&workspace.config.github.api_url, token, slug)?;

        Ok(Delivery::PullRequest { client, return_to })
    }

    #[instrument(skip_all, fields(changelog = %path.display()))]
    async fn update_changelog(
        &self,
        workspace: &Workspace,
        delivery: &Delivery,
        path: &Path,
        slug: Option<&RepoSlug>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<UpdateReport> {
        let relative = workspace.relative(path);
        let changelog = read_changelog(path)?;

        let since = match self.since.or(changelog.last_ran) {
            Some(since) => since,
            None => lookback_start(now, workspace.config.schedule.lookback_days)?,
        };
        info!(since = %since, "finding commits");

        let dir = relative.parent().unwrap_or_else(|| Path::new(""));
        let commits = workspace.repo.commits_touching(dir, &relative, since)?;
        let mut report = UpdateReport {
            changelog: relative.display().to_string(),
            commits: commits.len(),
            outcome: Outcome::Skipped,
        };

        if commits.is_empty() {
            info!("No commits, skipping changelog.");
            return Ok(report);
        }
        info!(commits = commits.len(), "found commits");

        let week = YearWeek::from_date(&now);
        let document = render_at(
            &changelog,
            &week.to_string(),
            &change_lines(&commits, slug),
            now,
        );

        report.outcome = match delivery {
            Delivery::Print => Outcome::Printed { document },
            Delivery::Write => {
                write_changelog(path, &document)?;
                Outcome::Written
            }
            Delivery::PullRequest { client, return_to } => {
                let directory = display_directory(&relative);
                let branch = branch_name(week, &directory);
                let git = &workspace.config.git;

                workspace
                    .repo
                    .checkout_new_branch(&branch, &git.base_branch, &git.remote)?;
                let pushed = commit_and_push(workspace, path, &relative, &branch, &document);
                let restored = workspace.repo.checkout_branch(return_to);
                pushed?;
                restored?;

                let settings = &workspace.config.pull_request;
                let mut proposal = PullRequestProposal::new(&directory, week, &branch, &git.base_branch)
                    .with_recipients(&changelog)
                    .maintainer_can_modify(settings.maintainer_can_modify);
                if !settings.label.is_empty() {
                    proposal = proposal.with_label(settings.label.clone());
                }

                let pull = client.open(&proposal).await?;
                Outcome::PullRequest { url: pull.html_url }
            }
        };

        Ok(report)
    }
}

/// Start of the lookback window ending at `now`
fn lookback_start(now: DateTime<Utc>, days: i64) -> anyhow::Result<DateTime<Utc>> {
    Duration::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .with_context(|| format!("lookback window of {} days is out of range", days))
}

fn commit_and_push(
    workspace: &Workspace,
    path: &Path,
    relative: &Path,
    branch: &str,
    document: &str,
) -> anyhow::Result<()> {
    let git = &workspace.config.git;

    write_changelog(path, document)?;
    workspace.repo.commit_paths(
        &[relative],
        &git.commit_message,
        &git.author_name,
        &git.author_email,
    )?;
    git_push_upstream(&workspace.root, &git.remote, branch)?;

    Ok(())
}

/// `<year>-<week>-<directory with separators replaced by ->`
fn branch_name(week: YearWeek, directory: &str) -> String {
    let name = if directory.is_empty() {
        "root".to_string()
    } else {
        directory.replace('/', "-")
    };
    format!("{}-{}", week.branch_component(), name)
}

fn print_reports(cli: &Cli, reports: &[UpdateReport]) -> anyhow::Result<()> {
    if cli.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }

    if reports.is_empty() && !cli.quiet {
        output::warning("No changelogs found.");
    }

    for report in reports {
        let name = path_style().apply_to(&report.changelog).to_string();
        match &report.outcome {
            Outcome::Skipped => {
                if !cli.quiet {
                    output::info(&format!("{}: no new commits", name));
                }
            }
            Outcome::Printed { document } => {
                println!("{}", output::header(&report.changelog));
                println!("{}", document);
            }
            Outcome::Written => {
                if !cli.quiet {
                    output::success(&format!("{}: added {} changes", name, report.commits));
                }
            }
            Outcome::PullRequest { url } => {
                if !cli.quiet {
                    output::success(&format!("{}: opened {}", name, url));
                }
            }
            Outcome::Failed { error } => output::error(&format!("{}: {}", name, error)),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use git2::{BranchType, Repository, Signature};
    use logbook_changelog::Changelog;
    use tempfile::TempDir;

    fn commit(temp: &TempDir, repo: &Repository, relative: &str, content: &str, message: &str) {
        let path = temp.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(relative)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let parents = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<_> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap();
    }

    fn setup() -> TempDir {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        repo.set_head("refs/heads/main").unwrap();
        commit(
            &temp,
            &repo,
            "web/CHANGELOG.md",
            "# Web\nOwner: alice\nNotify: carol\n\n---\n",
            "Add changelog",
        );
        commit(&temp, &repo, "web/index.html", "<h1>hi</h1>", "Add landing page");
        commit(&temp, &repo, "api/main.rs", "fn main() {}", "Add api");
        temp
    }

    fn run(temp: &TempDir, args: &[&str]) -> anyhow::Result<()> {
        let dir = temp.path().to_str().unwrap();
        let mut argv = vec!["logbook", "-q", "-C", dir, "update", "--repository", "octo-org/widgets"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv).execute()
    }

    #[test]
    fn test_branch_name() {
        let week = YearWeek { year: 2023, week: 8 };
        assert_eq!(branch_name(week, "apps/web"), "2023-8-apps-web");
        assert_eq!(branch_name(week, ""), "2023-8-root");
    }

    #[test]
    fn test_lookback_start() {
        let now = Utc::now();
        assert_eq!(lookback_start(now, 7).unwrap(), now - Duration::days(7));
        assert!(lookback_start(now, 1_000_000_000_000).is_err());
        assert!(lookback_start(now, i64::MAX).is_err());
    }

    #[test]
    fn test_local_update_writes_change_set() {
        let temp = setup();
        run(&temp, &["--local"]).unwrap();

        let content = std::fs::read_to_string(temp.path().join("web/CHANGELOG.md")).unwrap();
        let changelog = Changelog::parse(&content);
        assert_eq!(changelog.owner, vec!["alice"]);
        assert_eq!(changelog.notify, vec!["carol"]);
        assert_eq!(changelog.change_sets.len(), 1);
        assert_eq!(changelog.change_sets[0].changes, vec!["Add landing page"]);
        assert!(changelog.last_ran.is_some());
    }

    #[test]
    fn test_second_run_finds_nothing_new() {
        let temp = setup();
        run(&temp, &["--local"]).unwrap();
        let first = std::fs::read_to_string(temp.path().join("web/CHANGELOG.md")).unwrap();

        run(&temp, &["--local"]).unwrap();
        let second = std::fs::read_to_string(temp.path().join("web/CHANGELOG.md")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_dry_run_leaves_file_alone() {
        let temp = setup();
        run(&temp, &["--dry-run"]).unwrap();

        let content = std::fs::read_to_string(temp.path().join("web/CHANGELOG.md")).unwrap();
        assert_eq!(content, "# Web\nOwner: alice\nNotify: carol\n\n---\n");
    }

    #[test]
    fn test_pull_requests_need_a_token() {
        let temp = setup();
        let dir = temp.path().to_str().unwrap();
        let cli = Cli::parse_from(["logbook", "-q", "-C", dir, "list"]);
        let cmd = UpdateCommand {
            dry_run: false,
            local: false,
            since: None,
            github_token: None,
            repository: Some("octo-org/widgets".to_string()),
        };

        let result = cmd.execute(&cli);
        assert!(result.unwrap_err().to_string().contains("GITHUB_TOKEN"));
    }

    fn pull_request_command() -> UpdateCommand {
        UpdateCommand {
            dry_run: false,
            local: false,
            since: None,
            github_token: Some("t0ken".to_string()),
            repository: Some("o/r".to_string()),
        }
    }

    #[test]
    fn test_pull_request_flow_restores_branch_when_push_fails() {
        let temp = setup();
        let dir = temp.path().to_str().unwrap();
        let cli = Cli::parse_from(["logbook", "-q", "-C", dir, "list"]);
        let cmd = pull_request_command();

        let workspace = Workspace::open(&cli).unwrap();
        let delivery = cmd.delivery(&workspace).unwrap();
        let path = workspace.root.join("web/CHANGELOG.md");
        let slug = workspace.repo_slug(cmd.repository.as_deref());
        let now = Utc::now();

        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt
            .block_on(cmd.update_changelog(&workspace, &delivery, &path, slug.as_ref(), now))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to push"));

        assert_eq!(workspace.repo.current_branch().unwrap().as_deref(), Some("main"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# Web\nOwner: alice\nNotify: carol\n\n---\n");

        let repo = Repository::open(temp.path()).unwrap();
        let expected = branch_name(YearWeek::from_date(&now), "web");
        let branch = repo.find_branch(&expected, BranchType::Local).unwrap();
        let commit = branch.get().peel_to_commit().unwrap();
        assert_eq!(commit.message(), Some("Update Changelog."));

        let entry = commit.tree().unwrap().get_path(Path::new("web/CHANGELOG.md")).unwrap();
        let blob = repo.find_blob(entry.id()).unwrap();
        let committed = Changelog::parse(std::str::from_utf8(blob.content()).unwrap());
        assert_eq!(committed.owner, vec!["alice"]);
        assert_eq!(committed.change_sets.len(), 1);
        assert_eq!(committed.change_sets[0].changes, vec!["Add landing page"]);
    }

    #[test]
    fn test_pull_request_failure_is_reported_per_changelog() {
        let temp = setup();
        let dir = temp.path().to_str().unwrap();
        let cli = Cli::parse_from(["logbook", "-q", "-C", dir, "list"]);

        let result = pull_request_command().execute(&cli);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("1 of 1 changelogs failed to update"));

        let repo = Repository::open(temp.path()).unwrap();
        assert_eq!(repo.head().unwrap().shorthand(), Some("main"));
    }
}
