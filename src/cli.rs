//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `reposcope`.
#[derive(Debug, Parser)]
#[command(name = "reposcope", version, about = "Build a readable report for a GitHub repository")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a repository and print the report.
    Analyze {
        /// `owner/name` or a GitHub URL.
        repo: String,
        /// Ignore any cached report.
        #[arg(long)]
        fresh: bool,
        /// Print the report as JSON instead of markdown.
        #[arg(long)]
        json: bool,
    },
    /// Print the cached report for a repository, if still fresh.
    Show {
        /// `owner/name` or a GitHub URL.
        repo: String,
        /// Print the report as JSON instead of markdown.
        #[arg(long)]
        json: bool,
    },
    /// Rank the repository's files without calling the model.
    Files {
        /// `owner/name` or a GitHub URL.
        repo: String,
    },
    /// Ask the model what running a command in the repository would print.
    Simulate {
        /// `owner/name` or a GitHub URL.
        repo: String,
        /// Command to simulate; defaults to the report's first run command.
        #[arg(long)]
        command: Option<String>,
    },
    /// Empty the report cache.
    Clear,
}
