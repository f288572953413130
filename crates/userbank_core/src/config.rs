//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve database location and logging settings for front ends.
//!
//! # Invariants
//! - Returned `log_level` is always one of the normalized level names.
//! - Returned `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level, LoggingError};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "USERBANK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "USERBANK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "USERBANK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "userbank.sqlite3";

/// Settings shared by every userbank front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    ///
    /// # Errors
    /// - `UnsupportedLevel` for an unknown `USERBANK_LOG_LEVEL`.
    /// - `RelativeLogDir` for a relative `USERBANK_LOG_DIR`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggingError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(level) => normalize_level(&level)?,
            None => defaults.log_level,
        };

        let log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(dir) = &log_dir {
            if !dir.is_absolute() {
                return Err(LoggingError::RelativeLogDir(dir.clone()));
            }
        }

        Ok(Self {
            db_path: read(ENV_DB_PATH).map_or(defaults.db_path, PathBuf::from),
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use crate::logging::{default_log_level, LoggingError};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.db_path, PathBuf::from("userbank.sqlite3"));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn values_are_trimmed_and_normalized() {
        let log_dir = std::env::temp_dir().join("userbank-logs");
        let log_dir_str = log_dir.to_str().unwrap();
        let config = CoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, " /var/lib/userbank.db "),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_LOG_DIR, log_dir_str),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/userbank.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(log_dir));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "  "),
            (ENV_LOG_DIR, ""),
        ]))
        .unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn rejects_unknown_level_and_relative_log_dir() {
        let level_err =
            CoreConfig::from_lookup(lookup_from(&[(ENV_LOG_LEVEL, "chatty")])).unwrap_err();
        assert!(matches!(level_err, LoggingError::UnsupportedLevel(_)));

        let dir_err =
            CoreConfig::from_lookup(lookup_from(&[(ENV_LOG_DIR, "logs")])).unwrap_err();
        assert!(matches!(dir_err, LoggingError::RelativeLogDir(_)));
    }
}
