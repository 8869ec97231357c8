//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use miette::Result;
use tracing::debug;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::{Project, ProjectError};
use crate::core::{Config, Database};

/// Everything a data command needs: the located project, merged config and an open database
pub struct Session {
    pub project: Option<Project>,
    pub config: Config,
    pub db: Database,
}

impl Session {
    /// Locate the project, load configuration and open the database
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let project = locate_project(global)?;
        let config = Config::load(project.as_ref())?;

        let path = match &global.database {
            Some(path) => path.clone(),
            None => config.database_path(project.as_ref()).ok_or_else(|| {
                miette::miette!(
                    help = "run `minv init` or pass --database <file>",
                    "no inventory project found"
                )
            })?,
        };

        debug!(path = %path.display(), "opening inventory database");
        let db = Database::open(&path)?;

        Ok(Self {
            project,
            config,
            db,
        })
    }

    /// Output format after settling `auto` against the configured default
    pub fn format(&self, global: &GlobalOpts) -> OutputFormat {
        global.format.resolve(self.config.default_format.as_deref())
    }

    /// Close the database, surfacing any error from the final flush
    pub fn close(self) -> Result<()> {
        self.db.close()?;
        Ok(())
    }
}

/// Find the project from --project or the current directory
///
/// A missing project is not an error here; `--database` alone is enough.
pub fn locate_project(global: &GlobalOpts) -> Result<Option<Project>> {
    let found = match &global.project {
        Some(dir) => Project::discover_from(dir),
        None => Project::discover(),
    };

    match found {
        Ok(project) => Ok(Some(project)),
        Err(ProjectError::NotFound { .. }) if global.project.is_none() => Ok(None),
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

/// Log level for this invocation: --verbose, then --quiet, then config
pub fn log_level(global: &GlobalOpts) -> String {
    if global.verbose {
        return "debug".to_string();
    }
    if global.quiet {
        return "error".to_string();
    }

    // Logging is not up yet, so a broken config is reported later by the command
    locate_project(global)
        .ok()
        .and_then(|project| Config::load(project.as_ref()).ok())
        .map(|config| config.log_level().to_string())
        .unwrap_or_else(|| "warn".to_string())
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a quantity or price without trailing zeros
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.4}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Plural-aware count line used under list tables, e.g. "3 material(s) found."
pub fn count_noun(count: usize, noun: &str) -> String {
    format!("{} {}(s) found.", count, noun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("Ламинат дуб", 7), "Лами...");
        assert_eq!(truncate_str("Ламинат", 7), "Ламинат");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(120.0), "120");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1.1), "1.1");
        assert_eq!(format_number(2.35), "2.35");
        assert_eq!(format_number(0.333333), "0.3333");
    }

    #[test]
    fn test_count_noun() {
        assert_eq!(count_noun(3, "material"), "3 material(s) found.");
    }
}
