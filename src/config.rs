use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::upgrade::types::RunMetadata;
use crate::version::model::HostVersion;

// =============================================================================
// Defaults
// =============================================================================

/// First host release that ships the cache service used by the host-backed backend
pub const DEFAULT_BACKEND_THRESHOLD: HostVersion = HostVersion::new(6, 2);

/// Environment variable holding a tracing filter directive
pub const LOG_FILTER_ENV: &str = "UPGRADE_GUARD_LOG";

const APP_DIR_NAME: &str = "plugin-upgrade-guard";

const HISTORY_DB_FILE: &str = "history.db";
const DATA_DB_FILE: &str = "plugin-data.db";
const LOG_FILE: &str = "plugin-upgrade-guard.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Engine configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub backend_threshold: HostVersion,
    pub plugin_version: String,
    pub change_set: String,
    pub history: StorageConfig,
    pub data: StorageConfig,
    pub log: LogConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend_threshold: DEFAULT_BACKEND_THRESHOLD,
            plugin_version: env!("CARGO_PKG_VERSION").to_string(),
            change_set: "unknown".to_string(),
            history: StorageConfig::default(),
            data: StorageConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file; missing fields use defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn run_metadata(&self) -> RunMetadata {
        RunMetadata {
            plugin_version: self.plugin_version.clone(),
            change_set: self.change_set.clone(),
        }
    }

    pub fn history_db_path(&self) -> PathBuf {
        self.history.resolve(&data_dir(), HISTORY_DB_FILE)
    }

    pub fn data_db_path(&self) -> PathBuf {
        self.data.resolve(&data_dir(), DATA_DB_FILE)
    }
}

/// Location of a SQLite file; `None` means the data directory default
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// The configured path, or `file_name` inside `data_dir`
    pub fn resolve(&self, data_dir: &Path, file_name: &str) -> PathBuf {
        self.path.clone().unwrap_or_else(|| data_dir.join(file_name))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Returns the path to the data directory.
/// Uses $XDG_DATA_HOME/plugin-upgrade-guard if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/plugin-upgrade-guard,
/// or ./plugin-upgrade-guard if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join(LOG_FILE)
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn engine_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = EngineConfig::from_json(r#"{ "backendThreshold": "7.1" }"#).unwrap();

        assert_eq!(result.backend_threshold, HostVersion::new(7, 1));
        assert_eq!(result.change_set, "unknown");
        assert_eq!(result.log, LogConfig::default());
        assert_eq!(result.history, StorageConfig::default());
    }

    #[test]
    fn engine_config_from_full_object_parses_all_fields() {
        let result = EngineConfig::from_json(
            r#"{
                "backendThreshold": "6.4",
                "pluginVersion": "3.1.0",
                "changeSet": "f00d",
                "history": { "path": "/var/lib/guard/history.db" },
                "data": { "path": "/var/lib/guard/data.db" },
                "log": { "level": "debug", "json": true }
            }"#,
        )
        .unwrap();

        assert_eq!(
            result,
            EngineConfig {
                backend_threshold: HostVersion::new(6, 4),
                plugin_version: "3.1.0".to_string(),
                change_set: "f00d".to_string(),
                history: StorageConfig {
                    path: Some(PathBuf::from("/var/lib/guard/history.db")),
                },
                data: StorageConfig {
                    path: Some(PathBuf::from("/var/lib/guard/data.db")),
                },
                log: LogConfig {
                    level: "debug".to_string(),
                    json: true,
                },
            }
        );
        assert_eq!(
            result.run_metadata(),
            RunMetadata {
                plugin_version: "3.1.0".to_string(),
                change_set: "f00d".to_string(),
            }
        );
    }

    #[test]
    fn engine_config_rejects_malformed_threshold() {
        let result = EngineConfig::from_json(r#"{ "backendThreshold": "6" }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_reads_file_and_reports_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "changeSet": "abc" }"#).unwrap();

        assert_eq!(EngineConfig::load(&path).unwrap().change_set, "abc");

        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(
            EngineConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn storage_resolve_prefers_configured_path() {
        let storage = StorageConfig {
            path: Some(PathBuf::from("/srv/guard/custom.db")),
        };

        assert_eq!(
            storage.resolve(Path::new("/var/lib/guard"), HISTORY_DB_FILE),
            PathBuf::from("/srv/guard/custom.db")
        );
    }

    #[test]
    fn storage_resolve_places_unset_path_in_data_dir() {
        assert_eq!(
            StorageConfig::default().resolve(Path::new("/var/lib/guard"), DATA_DB_FILE),
            PathBuf::from("/var/lib/guard/plugin-data.db")
        );
    }

    #[test]
    fn database_paths_follow_config_overrides() {
        let config = EngineConfig {
            history: StorageConfig {
                path: Some(PathBuf::from("/tmp/h.db")),
            },
            ..EngineConfig::default()
        };

        assert_eq!(config.history_db_path(), PathBuf::from("/tmp/h.db"));
        assert_eq!(config.data_db_path(), data_dir().join(DATA_DB_FILE));
    }

    #[test]
    fn default_paths_live_side_by_side_in_data_dir() {
        let config = EngineConfig::default();
        let dir = data_dir();

        assert_eq!(config.history_db_path(), dir.join("history.db"));
        assert_eq!(config.data_db_path(), dir.join("plugin-data.db"));
        assert_eq!(log_path(), dir.join("plugin-upgrade-guard.log"));
        assert!(dir.ends_with(APP_DIR_NAME));
    }

    #[rstest]
    #[case(Some("/xdg"), Some("/home/op"), "/xdg/plugin-upgrade-guard")]
    #[case(None, Some("/home/op"), "/home/op/.local/share/plugin-upgrade-guard")]
    #[case(None, None, "./plugin-upgrade-guard")]
    fn data_dir_prefers_xdg_then_home_then_cwd(
        #[case] xdg: Option<&str>,
        #[case] home: Option<&str>,
        #[case] expected: &str,
    ) {
        let path = data_dir_with_env(xdg.map(str::to_string), home.map(PathBuf::from));
        assert_eq!(path, PathBuf::from(expected));
    }
}
