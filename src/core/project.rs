//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::db::DATABASE_FILE;

/// Name of the per-project metadata directory
pub const PROJECT_DIR: &str = ".minv";

/// Represents an inventory project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .minv/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::write_skeleton(root)
    }

    /// Initialize even if .minv/ exists; the config is rewritten, the database kept
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        Self::write_skeleton(root)
    }

    fn write_skeleton(root: PathBuf) -> Result<Self, ProjectError> {
        let project_dir = root.join(PROJECT_DIR);
        std::fs::create_dir_all(&project_dir)
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        std::fs::write(project_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# Inventory project configuration

# Database file, relative to the project root
# database: .minv/inventory.db

# Default output format (auto, tsv, csv, md, json, yaml, id)
# default_format: auto

# Log level when --verbose is not given (error, warn, info, debug, trace)
# log_level: warn
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .minv metadata directory
    pub fn project_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Get the project config file path
    pub fn config_path(&self) -> PathBuf {
        self.project_dir().join("config.yaml")
    }

    /// Default database location for this project
    pub fn default_database_path(&self) -> PathBuf {
        self.root.join(DATABASE_FILE)
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not an inventory project (searched from {searched_from:?}). Run 'minv init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("inventory project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.project_dir().is_dir());
        assert!(project.config_path().exists());
        assert!(project
            .default_database_path()
            .ends_with(".minv/inventory.db"));
    }

    #[test]
    fn test_project_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));

        assert!(Project::init_force(tmp.path()).is_ok());
    }

    #[test]
    fn test_project_discover_finds_project_dir() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let subdir = tmp.path().join("some/nested/dir");
        std::fs::create_dir_all(&subdir).unwrap();

        let project = Project::discover_from(&subdir).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_project_discover_fails_without_project_dir() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }
}
