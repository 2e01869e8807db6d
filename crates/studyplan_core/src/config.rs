//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank environment values count as unset.
//! - Resolution never fails; every field has a default.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "STUDYPLAN_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "STUDYPLAN_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "STUDYPLAN_LOG_DIR";

const APP_DIR_NAME: &str = "studyplan";
const DB_FILE_NAME: &str = "studyplan.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let app_dir = default_app_dir();

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| app_dir.join(DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| app_dir.join("logs")),
        }
    }
}

/// `<data dir>/studyplan`, or `<temp dir>/studyplan` without a data dir.
pub fn default_app_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::{default_app_dir, AppConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn from_lookup_uses_defaults_for_missing_and_blank_values() {
        let vars = HashMap::from([(DB_PATH_ENV, "   ".to_string())]);
        let config = AppConfig::from_lookup(|name| vars.get(name).cloned());

        assert_eq!(config.db_path, default_app_dir().join("studyplan.sqlite3"));
        assert_eq!(config.log_dir, default_app_dir().join("logs"));
        assert!(!config.log_level.is_empty());
    }

    #[test]
    fn from_lookup_prefers_explicit_values() {
        let vars = HashMap::from([
            (DB_PATH_ENV, "/tmp/plans.db".to_string()),
            (LOG_LEVEL_ENV, " warn ".to_string()),
            (LOG_DIR_ENV, "/tmp/plan-logs".to_string()),
        ]);
        let config = AppConfig::from_lookup(|name| vars.get(name).cloned());

        assert_eq!(config.db_path, PathBuf::from("/tmp/plans.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/plan-logs"));
    }
}
