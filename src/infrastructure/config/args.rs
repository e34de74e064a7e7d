use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "photowall",
    version,
    about = "Loads a wall of remote images through a bounded LRU cache",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// File listing image addresses, one per line.
    #[arg(short, long, value_name = "PATH", env = "PHOTOWALL_URLS")]
    pub urls: Option<PathBuf>,

    /// Process memory budget in bytes; the cache gets an eighth of it.
    #[arg(long, value_name = "BYTES")]
    pub memory_budget: Option<u64>,

    /// Connect timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Read timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub read_timeout: Option<u64>,

    /// Index of the first visible item.
    #[arg(long)]
    pub first: Option<usize>,

    /// Number of visible items.
    #[arg(long)]
    pub count: Option<usize>,

    /// Seconds to wait for the visible window to fill.
    #[arg(long, value_name = "SECS")]
    pub settle_timeout: Option<u64>,

    /// After the first window loads, scroll so this index is first.
    #[arg(long, value_name = "INDEX")]
    pub scroll_to: Option<usize>,
}
