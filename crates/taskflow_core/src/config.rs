//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank variables behave as unset.
//! - `log_level` is always a normalized level name.

use crate::logging::{default_log_level, init_logging, normalize_level};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "TASKFLOW_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "TASKFLOW_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKFLOW_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "taskflow.sqlite3";

/// Settings shared by the CLI and FFI entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding the storage slot.
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads `TASKFLOW_*` variables from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    ///
    /// # Errors
    /// - `TASKFLOW_LOG_LEVEL` is set to an unsupported level.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level)?;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        Ok(config)
    }

    /// Starts file logging when `log_dir` is configured.
    ///
    /// Returns `Ok(false)` when logging is disabled by configuration.
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(dir) = &self.log_dir else {
            return Ok(false);
        };
        let dir = dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: {}", dir.display()))?;
        init_logging(self.log_level, dir)?;
        Ok(true)
    }
}
