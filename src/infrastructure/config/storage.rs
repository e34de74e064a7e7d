use super::app_config::{AppConfig, project_dirs};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors reading or writing `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform reports no config directory.
    #[error("no platform config directory available")]
    NoConfigDir,
    /// Reading or writing the file failed.
    #[error("config file {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration could not be encoded as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Reads and writes the configuration file.
#[derive(Debug)]
pub struct StorageManager {
    default_path: PathBuf,
}

impl StorageManager {
    /// Uses `config.toml` in the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has no home directory.
    pub fn new() -> Result<Self, ConfigError> {
        let dirs = project_dirs().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_dir(dirs.config_dir()))
    }

    /// Uses `config.toml` inside `dir`.
    #[must_use]
    pub fn with_dir(dir: &Path) -> Self {
        Self {
            default_path: dir.join(CONFIG_FILE_NAME),
        }
    }

    /// Loads the configuration from `path_override` or the default path.
    ///
    /// A missing file is created with defaults. A malformed file is
    /// reported and replaced by defaults in memory only.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the default cannot be written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = path_override.unwrap_or(&self.default_path);

        if !path.exists() {
            info!(path = %path.display(), "Config file not found, writing defaults");
            let config = AppConfig::default();
            write_atomic(path, &config)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Malformed config file, using defaults");
            AppConfig::default()
        }))
    }

    /// Writes `config` to the default path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be written.
    pub fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        write_atomic(&self.default_path, config)
    }
}

/// Writes through a temp file in the same directory, then renames it over `path`.
fn write_atomic(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let content = toml::to_string_pretty(config)?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_error)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
    temp_file.write_all(content.as_bytes()).map_err(io_error)?;
    temp_file.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_creates_default_if_missing() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("photowall");
        let manager = StorageManager::with_dir(&nested);

        let config = manager.load_config(None).unwrap();
        assert_eq!(config.wall.visible_count, 12);
        assert!(nested.join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_load_config_handles_malformed_file() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path());
        fs::write(dir.path().join(CONFIG_FILE_NAME), "this is [not valid toml").unwrap();

        let config = manager.load_config(None).unwrap();
        assert_eq!(config.network.read_timeout_secs, 10);
    }

    #[test]
    fn test_load_config_from_override_path() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(&dir.path().join("unused"));
        let custom = dir.path().join("custom.toml");
        fs::write(&custom, "[wall]\nvisible_count = 3\n").unwrap();

        let config = manager.load_config(Some(&custom)).unwrap();
        assert_eq!(config.wall.visible_count, 3);
        assert!(!dir.path().join("unused").exists());
    }

    #[test]
    fn test_save_and_reload_config() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path());

        let mut config = AppConfig::default();
        config.cache.memory_budget_bytes = Some(64 * 1024 * 1024);
        config.wall.first_visible = 9;
        manager.save_config(&config).unwrap();

        let loaded = manager.load_config(None).unwrap();
        assert_eq!(loaded.cache.memory_budget_bytes, Some(64 * 1024 * 1024));
        assert_eq!(loaded.wall.first_visible, 9);
    }

    #[test]
    fn test_unreadable_config_reports_path() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path());
        let as_dir = dir.path().join("config-dir.toml");
        fs::create_dir(&as_dir).unwrap();

        let err = manager.load_config(Some(&as_dir)).unwrap_err();
        assert!(matches!(err, ConfigError::Io { ref path, .. } if path == &as_dir));
    }
}
