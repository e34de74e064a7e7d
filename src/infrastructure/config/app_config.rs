//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::infrastructure::image::{
    DEFAULT_BUDGET_DIVISOR, HttpFetcherConfig, resolve_memory_budget,
};

const APP_NAME: &str = "photowall";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";

/// Platform directories for this application.
pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
}

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and overridden by CLI flags.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// File listing image addresses, one per line.
    #[serde(default)]
    pub urls: Option<PathBuf>,

    /// Memory cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Network configuration.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Grid window configuration.
    #[serde(default)]
    pub wall: WallConfig,
}

/// Memory cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Process memory budget in bytes. Probed from the OS when unset.
    #[serde(default)]
    pub memory_budget_bytes: Option<u64>,

    /// The cache gets `budget / budget_divisor` bytes.
    #[serde(default = "default_budget_divisor")]
    pub budget_divisor: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_budget_bytes: None,
            budget_divisor: default_budget_divisor(),
        }
    }
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Read timeout in seconds.
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,

    /// Custom User-Agent header.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            user_agent: None,
        }
    }
}

/// Grid window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallConfig {
    /// Index of the first visible item at startup.
    #[serde(default)]
    pub first_visible: usize,

    /// Number of items visible at once.
    #[serde(default = "default_visible_count")]
    pub visible_count: usize,

    /// How long to wait for the visible window to fill, in seconds.
    #[serde(default = "default_settle_timeout_secs")]
    pub settle_timeout_secs: u64,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            first_visible: 0,
            visible_count: default_visible_count(),
            settle_timeout_secs: default_settle_timeout_secs(),
        }
    }
}

const fn default_budget_divisor() -> u64 {
    DEFAULT_BUDGET_DIVISOR
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

const fn default_read_timeout_secs() -> u64 {
    10
}

const fn default_visible_count() -> usize {
    12
}

const fn default_settle_timeout_secs() -> u64 {
    30
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(urls) = args.urls {
            self.urls = Some(urls);
        }
        if let Some(budget) = args.memory_budget {
            self.cache.memory_budget_bytes = Some(budget);
        }
        if let Some(connect_timeout) = args.connect_timeout {
            self.network.connect_timeout_secs = connect_timeout;
        }
        if let Some(read_timeout) = args.read_timeout {
            self.network.read_timeout_secs = read_timeout;
        }
        if let Some(first) = args.first {
            self.wall.first_visible = first;
        }
        if let Some(count) = args.count {
            self.wall.visible_count = count;
        }
        if let Some(settle_timeout) = args.settle_timeout {
            self.wall.settle_timeout_secs = settle_timeout;
        }
    }

    /// Settings for the HTTP fetcher.
    #[must_use]
    pub fn fetcher_config(&self) -> HttpFetcherConfig {
        let defaults = HttpFetcherConfig::default();
        HttpFetcherConfig {
            connect_timeout: Duration::from_secs(self.network.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.network.read_timeout_secs),
            user_agent: self
                .network
                .user_agent
                .clone()
                .unwrap_or(defaults.user_agent),
        }
    }

    /// Resolves the memory budget the cache capacity is derived from.
    #[must_use]
    pub fn memory_budget(&self) -> u64 {
        resolve_memory_budget(self.cache.memory_budget_bytes)
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().join("photowall.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: LogLevel::Info,
            urls: None,
            cache: CacheConfig::default(),
            network: NetworkConfig::default(),
            wall: WallConfig::default(),
        }
    }
}
