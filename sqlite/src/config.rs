//! Database configuration.
//!
//! Defines the YAML-serializable settings used by
//! [`Database::from_config`](crate::Database::from_config).
//!
//! # Example YAML
//!
//! ```yaml
//! path: data/app.db
//! busy_timeout_ms: 5000
//! foreign_keys: true
//! slow_commit_threshold_ms: 1000
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_foreign_keys() -> bool {
    true
}

fn default_slow_commit_threshold_ms() -> u64 {
    1_000
}

/// Settings for opening a [`Database`](crate::Database).
///
/// Every field except `path` has a default, so a minimal file only names the
/// database file. Without a `path` the database lives in memory.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use txkit_sqlite::DatabaseConfig;
///
/// let config: DatabaseConfig = serde_yaml::from_str("path: app.db").unwrap();
/// assert!(config.foreign_keys);
/// assert_eq!(config.slow_commit_threshold(), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file; `None` opens an in-memory database.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// How long to wait on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Enable `PRAGMA foreign_keys`.
    #[serde(default = "default_foreign_keys")]
    pub foreign_keys: bool,
    /// Commits slower than this are logged with their query list.
    #[serde(default = "default_slow_commit_threshold_ms")]
    pub slow_commit_threshold_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
            foreign_keys: default_foreign_keys(),
            slow_commit_threshold_ms: default_slow_commit_threshold_ms(),
        }
    }
}

impl DatabaseConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::TxError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::TxError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Writes configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Busy timeout as a [`Duration`].
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Slow-commit threshold as a [`Duration`].
    pub fn slow_commit_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_commit_threshold_ms)
    }
}
