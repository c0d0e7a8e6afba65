use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "arcade",
    version,
    about = "Browse the free-to-play game catalog and fetch its artwork",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Catalog API root URL.
    #[arg(long, value_name = "URL", env = "ARCADE_API_BASE", global = true)]
    pub api_base: Option<String>,

    /// Image request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Share one download between concurrent requests for the same image.
    #[arg(long, global = true)]
    pub coalesce_requests: Option<bool>,

    /// Maximum number of images kept in memory.
    #[arg(long, global = true)]
    pub cache_entries: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List games and load their thumbnails.
    Games {
        /// Only show the first N games.
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
    /// Show one game and load all of its artwork.
    Game {
        /// Catalog identifier.
        id: u64,
    },
    /// Fetch a single image.
    Image {
        /// Image URL.
        url: String,

        /// Crop to the largest centered square.
        #[arg(long)]
        crop: bool,

        /// Write the result as PNG to this path.
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}
