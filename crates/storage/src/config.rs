#![forbid(unsafe_code)]

//! Store configuration.
//!
//! Values come from an optional TOML file; `READING_TRACKER_DIR` and `READING_TRACKER_LOG`
//! override the storage directory and log level when set.

use crate::StoreError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DB_FILE_NAME: &str = "reading_tracker.db";
const ENV_STORAGE_DIR: &str = "READING_TRACKER_DIR";
const ENV_LOG_LEVEL: &str = "READING_TRACKER_LOG";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub storage_dir: PathBuf,
    pub db_file_name: String,
    pub busy_timeout_ms: u64,
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("."),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            busy_timeout_ms: 5_000,
            log_level: "info".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn for_dir(storage_dir: impl AsRef<Path>) -> Self {
        Self {
            storage_dir: storage_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, StoreError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, then applies environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&raw)?;
        Ok(config.with_env_overrides())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(ENV_STORAGE_DIR) {
            if !dir.trim().is_empty() {
                self.storage_dir = PathBuf::from(dir);
            }
        }
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            if !level.trim().is_empty() {
                self.log_level = level.trim().to_string();
            }
        }
        self
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage_dir.join(&self.db_file_name)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    fn validate(&self) -> Result<(), StoreError> {
        let name = self.db_file_name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("db_file_name must not be empty"));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(StoreError::InvalidInput(
                "db_file_name must be a bare file name",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = StoreConfig::from_toml_str("storage_dir = \"/tmp/rt\"\n").unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/rt"));
        assert_eq!(config.db_file_name, DEFAULT_DB_FILE_NAME);
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
        assert_eq!(config.db_path(), PathBuf::from("/tmp/rt").join(DEFAULT_DB_FILE_NAME));
    }

    #[test]
    fn rejects_nested_db_file_name() {
        let err = StoreConfig::from_toml_str("db_file_name = \"a/b.db\"\n").unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = StoreConfig::from_toml_str("busy_timeout_ms = \"soon\"\n").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }
}
