//! List command

use clap::Args;
use tracing::info;

use super::Workspace;
use crate::cli::output::{self, path_style};
use crate::cli::{Cli, OutputFormat};

/// List the changelogs that would be maintained
#[derive(Debug, Args)]
pub struct ListCommand {}

impl ListCommand {
    /// Execute the list command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let workspace = Workspace::open(cli)?;
        let changelogs: Vec<String> = workspace
            .discover_changelogs()?
            .iter()
            .map(|path| workspace.relative(path).display().to_string())
            .collect();
        info!(count = changelogs.len(), root = %workspace.root.display(), "listed changelogs");

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&changelogs)?),
            OutputFormat::Text => {
                if changelogs.is_empty() {
                    if !cli.quiet {
                        output::warning("No changelogs found.");
                    }
                } else {
                    for changelog in &changelogs {
                        println!("{}", path_style().apply_to(changelog));
                    }
                }
            }
        }

        Ok(())
    }
}
