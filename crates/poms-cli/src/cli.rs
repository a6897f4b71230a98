//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// P.O.M.S - Ask about trading orders, portfolio holdings or performance in plain English.
#[derive(Debug, Parser)]
#[command(name = "poms")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "POMS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Model profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Route a query to its pipeline and show the extracted data
    Query(QueryArgs),

    /// Show which pipeline a query would use, without calling the model
    Classify(QueryArgs),

    /// List example queries
    Examples,

    /// Manage model profiles
    Profile(ProfileArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Free-text query arguments.
#[derive(Debug, Parser)]
pub struct QueryArgs {
    /// Query text (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

impl QueryArgs {
    /// The query as one string
    pub fn text(&self) -> String {
        self.text.join(" ")
    }
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
