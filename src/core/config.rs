//! Configuration management with layered hierarchy

use miette::Diagnostic;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::Project;

/// Inventory configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Database file; relative paths resolve against the project root
    pub database: Option<PathBuf>,

    /// Default output format
    pub default_format: Option<String>,

    /// Log level used when --verbose is not given
    pub log_level: Option<String>,
}

/// Errors reading a configuration file
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot read config file {path:?}: {message}")]
    #[diagnostic(code(minv::config::io))]
    Read { path: PathBuf, message: String },

    #[error("invalid config file {path:?}: {message}")]
    #[diagnostic(
        code(minv::config::parse),
        help("keys are: database, default_format, log_level")
    )]
    Parse { path: PathBuf, message: String },
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    ///
    /// 1. Built-in defaults
    /// 2. Global user config (`<config dir>/minv/config.yaml`)
    /// 3. Project config (`.minv/config.yaml`)
    /// 4. Environment variables (`MINV_DATABASE`, `MINV_FORMAT`, `MINV_LOG`)
    pub fn load(project: Option<&Project>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path)? {
                config.merge(global);
            }
        }

        if let Some(project) = project {
            if let Some(local) = Self::read_file(&project.config_path())? {
                config.merge(local);
            }
        }

        config.merge(Self::from_env(|key| std::env::var(key).ok()));

        Ok(config)
    }

    /// Read a config file, returning None when it does not exist
    pub fn read_file(path: &Path) -> Result<Option<Config>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // An all-comment file parses as null
        if contents.lines().all(|l| {
            let l = l.trim();
            l.is_empty() || l.starts_with('#')
        }) {
            return Ok(Some(Config::default()));
        }

        serde_yml::from_str::<Config>(&contents)
            .map(Some)
            .map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    /// Build the environment layer from a variable getter
    fn from_env(get: impl Fn(&str) -> Option<String>) -> Config {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        Config {
            database: non_empty("MINV_DATABASE").map(PathBuf::from),
            default_format: non_empty("MINV_FORMAT"),
            log_level: non_empty("MINV_LOG"),
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "minv")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.database.is_some() {
            self.database = other.database;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }

    /// Database file to open, falling back to the project default
    pub fn database_path(&self, project: Option<&Project>) -> Option<PathBuf> {
        match (&self.database, project) {
            (Some(db), Some(project)) => Some(resolve(project.root(), db.clone())),
            (Some(db), None) => Some(db.clone()),
            (None, Some(project)) => Some(project.default_database_path()),
            (None, None) => None,
        }
    }

    /// Log level, defaulting to warnings only
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("warn")
    }
}

fn resolve(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

/// Initializes tracing on stderr using the provided level as the default filter
///
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("minv={}", level);
    let filter_directive = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let _ = fmt()
        .with_env_filter(EnvFilter::new(filter_directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_merge_prefers_later_layer() {
        let mut base = Config {
            database: Some(PathBuf::from("a.db")),
            default_format: Some("tsv".to_string()),
            log_level: None,
        };
        base.merge(Config {
            database: None,
            default_format: Some("json".to_string()),
            log_level: Some("debug".to_string()),
        });

        assert_eq!(base.database, Some(PathBuf::from("a.db")));
        assert_eq!(base.default_format.as_deref(), Some("json"));
        assert_eq!(base.log_level(), "debug");
    }

    #[test]
    fn test_env_layer_ignores_blank_values() {
        let env = Config::from_env(|key| match key {
            "MINV_DATABASE" => Some("/srv/stock.db".to_string()),
            "MINV_FORMAT" => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(env.database, Some(PathBuf::from("/srv/stock.db")));
        assert!(env.default_format.is_none());
        assert!(env.log_level.is_none());
    }

    #[test]
    fn test_default_config_file_parses() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        let config = Config::read_file(&project.config_path()).unwrap();
        assert_eq!(config, Some(Config::default()));
    }

    #[test]
    fn test_invalid_config_file_is_reported() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "database: [unclosed").unwrap();

        let err = Config::read_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_database_path_resolution() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        let config = Config::default();
        assert_eq!(
            config.database_path(Some(&project)),
            Some(project.default_database_path())
        );
        assert_eq!(config.database_path(None), None);

        let config = Config {
            database: Some(PathBuf::from("data/stock.db")),
            ..Config::default()
        };
        assert_eq!(
            config.database_path(Some(&project)),
            Some(project.root().join("data/stock.db"))
        );
    }
}
