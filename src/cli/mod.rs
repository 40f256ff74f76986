pub mod check;
pub mod config;
pub mod rule;

use clap::{Parser, Subcommand};
use pyflint::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pyflint")]
#[command(author, version, about = "Lint Python source files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Files or directories to check; `-` reads from stdin
    #[arg(value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    pub format: Format,

    /// Apply fixes in place (prints the fixed source when reading stdin)
    #[arg(long)]
    pub fix: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comma-separated rule codes or prefixes to enable, replacing the configured list
    #[arg(long, value_delimiter = ',', value_name = "CODES")]
    pub select: Option<Vec<String>>,

    /// Comma-separated rule codes or prefixes to enable on top of the selection
    #[arg(long, value_delimiter = ',', value_name = "CODES")]
    pub extend_select: Option<Vec<String>>,

    /// Comma-separated rule codes or prefixes to disable
    #[arg(long, value_delimiter = ',', value_name = "CODES")]
    pub ignore: Option<Vec<String>>,

    /// Maximum line length for E501
    #[arg(long, value_name = "N")]
    pub line_length: Option<u32>,

    /// Force colored output
    #[arg(long, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Always exit with status 0 when checking completes
    #[arg(long)]
    pub exit_zero: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configuration file management
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
    /// Show detailed documentation for a rule
    Rule {
        /// Rule code (e.g., "F401")
        code: Option<String>,

        /// List all available rules
        #[arg(short, long)]
        list: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
    GithubActions,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::GithubActions => OutputFormat::GithubActions,
        }
    }
}
