//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Format and spell-fix Markdown files in place, after backing every one up
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fixmd",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"),
    about
)]
pub struct CliArgs {
    /// Markdown file or directory to process
    pub path: PathBuf,

    /// Process directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Maximum number of concurrent API calls
    #[arg(short, long, value_name = "N", env = "FIXMD_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// File extension to match, without the dot
    #[arg(long = "ext", value_name = "EXT")]
    pub extension: Option<String>,

    /// Backup root [default: ./backup]
    #[arg(long, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}
