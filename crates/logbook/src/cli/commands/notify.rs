//! Notify command

use std::path::Path;

use clap::Args;
use serde::Serialize;
use tracing::{error, info, warn};

use logbook_changelog::read_changelog;
use logbook_delivery::{Announcement, DeliveryError, SlackNotifier};

use super::{display_directory, Workspace};
use crate::cli::output::{self, path_style};
use crate::cli::{Cli, OutputFormat};

/// Announce changelogs changed between two revisions on Slack
#[derive(Debug, Args)]
pub struct NotifyCommand {
    /// Revision the changes are compared against
    #[arg(long)]
    pub base: String,

    /// Revision carrying the changes
    #[arg(long, default_value = "HEAD")]
    pub head: String,

    /// Pull request that carried the changes
    #[arg(long, value_name = "URL")]
    pub pull_request_url: String,

    /// File name identifying changelogs
    #[arg(long, default_value = "CHANGELOG.md")]
    pub file_name: String,

    /// Slack incoming webhook URL
    #[arg(long, env = "SLACK_WEBHOOK", hide_env_values = true)]
    pub slack_webhook: String,
}

#[derive(Debug, Serialize)]
struct NotifyReport {
    changelog: String,
    sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl NotifyCommand {
    /// Execute the notify command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(base = %self.base, head = %self.head, "executing notify command");
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        let workspace = Workspace::open(cli)?;
        let changed = workspace
            .repo
            .changed_changelogs(&self.base, &self.head, &self.file_name)?;
        info!(count = changed.len(), "changed changelogs");

        let slack = &workspace.config.slack;
        let notifier = SlackNotifier::new(&self.slack_webhook)?
            .with_identity(slack.username.clone(), slack.icon_emoji.clone());

        let mut reports = Vec::with_capacity(changed.len());
        for relative in &changed {
            let report = match self.announce(&workspace, &notifier, relative).await {
                Ok(sent) => NotifyReport {
                    changelog: relative.display().to_string(),
                    sent,
                    error: None,
                },
                Err(e) => {
                    error!(changelog = %relative.display(), error = %e, "failed to announce changelog");
                    NotifyReport {
                        changelog: relative.display().to_string(),
                        sent: false,
                        error: Some(format!("{:#}", e)),
                    }
                }
            };
            reports.push(report);
        }

        print_reports(cli, &reports)?;

        let failed = reports.iter().filter(|r| r.error.is_some()).count();
        if failed > 0 {
            anyhow::bail!("{} of {} announcements failed", failed, reports.len());
        }

        Ok(())
    }

    /// Announce one changelog; `false` when it has nothing to announce
    async fn announce(
        &self,
        workspace: &Workspace,
        notifier: &SlackNotifier,
        relative: &Path,
    ) -> anyhow::Result<bool> {
        let changelog = read_changelog(&workspace.root.join(relative))?;
        let directory = display_directory(relative);

        let announcement =
            match Announcement::from_changelog(directory, &changelog, &self.pull_request_url) {
                Ok(announcement) => announcement,
                Err(DeliveryError::NothingToAnnounce(_)) => {
                    warn!(changelog = %relative.display(), "changelog has no change-sets, not announcing");
                    return Ok(false);
                }
                Err(e) => return Err(e.into()),
            };

        notifier.send(&announcement).await?;
        Ok(true)
    }
}

fn print_reports(cli: &Cli, reports: &[NotifyReport]) -> anyhow::Result<()> {
    if cli.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }

    if reports.is_empty() && !cli.quiet {
        output::info("No changelogs changed.");
    }

    for report in reports {
        let name = path_style().apply_to(&report.changelog).to_string();
        match (&report.error, report.sent) {
            (Some(error), _) => output::error(&format!("{}: {}", name, error)),
            (None, true) => {
                if !cli.quiet {
                    output::success(&format!("{}: announced", name));
                }
            }
            (None, false) => {
                if !cli.quiet {
                    output::warning(&format!("{}: nothing to announce", name));
                }
            }
        }
    }

    Ok(())
}
