//! Inspect command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use logbook_changelog::{format_timestamp, read_changelog, Changelog};

use crate::cli::output::{self, title_style};
use crate::cli::{Cli, OutputFormat};

/// Show how a changelog file parses
#[derive(Debug, Args)]
pub struct InspectCommand {
    /// Changelog file, relative to the working directory
    pub file: PathBuf,

    /// Show every change-set instead of only the newest
    #[arg(short, long)]
    pub all: bool,
}

impl InspectCommand {
    /// Execute the inspect command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let path = cli.start_dir()?.join(&self.file);
        info!(path = %path.display(), "executing inspect command");

        let changelog = read_changelog(&path)?;

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&changelog)?),
            OutputFormat::Text => println!("{}", self.describe(&changelog)),
        }

        Ok(())
    }

    fn describe(&self, changelog: &Changelog) -> String {
        let mut lines = vec![
            output::header(&self.file.display().to_string()),
            output::key_value("Owner", &output::list_or_dash(&changelog.owner)),
            output::key_value("Notify", &output::list_or_dash(&changelog.notify)),
            output::key_value(
                "Last ran",
                &changelog
                    .last_ran
                    .map(format_timestamp)
                    .unwrap_or_else(|| "never".to_string()),
            ),
            output::key_value("Change-sets", &changelog.change_sets.len().to_string()),
        ];

        let shown = if self.all {
            changelog.change_sets.len()
        } else {
            1
        };

        for set in changelog.change_sets.iter().take(shown) {
            lines.push(String::new());
            lines.push(title_style().apply_to(&set.title).to_string());
            lines.extend(set.changes.iter().map(|change| format!("  * {}", change)));
        }

        lines.join("\n")
    }
}
