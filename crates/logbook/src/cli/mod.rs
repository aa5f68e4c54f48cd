//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{InspectCommand, ListCommand, NotifyCommand, UpdateCommand};

/// Logbook - keeps per-directory changelogs up to date from git history
#[derive(Debug, Parser)]
#[command(name = "logbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Directory to run in (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a change-set to every changelog with new commits
    Update(UpdateCommand),

    /// Announce changelogs changed between two revisions on Slack
    Notify(NotifyCommand),

    /// Show how a changelog file parses
    Inspect(InspectCommand),

    /// List the changelogs that would be maintained
    List(ListCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Update(ref cmd) => cmd.execute(&self),
            Commands::Notify(ref cmd) => cmd.execute(&self),
            Commands::Inspect(ref cmd) => cmd.execute(&self),
            Commands::List(ref cmd) => cmd.execute(&self),
        }
    }

    /// Directory the command starts from
    pub fn start_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}
