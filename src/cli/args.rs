//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cert-expiry-bot")]
#[command(version)]
#[command(about = "Tracks TLS certificate expiry for each user's hosts", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (default: config/default.toml if present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host data file, overriding the settings file
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Per-host deadline in seconds, overriding the settings file
    #[arg(long, global = true, value_name = "SECS")]
    pub deadline: Option<u64>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer `<user id> <text>` lines from stdin until EOF
    Serve,

    /// Print every user's summary and exit
    Summarize(SummarizeArgs),

    /// Check a single host or URL
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Hostname, host:port or URL
    #[arg(required = true)]
    pub host: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One block per user
    Plain,
    /// JSON object keyed by user id
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
