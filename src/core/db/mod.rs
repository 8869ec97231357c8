//! SQLite-backed inventory store
//!
//! This module owns the single database connection a process uses:
//! - Opened once per command, passed by reference to whoever needs it
//! - Every write is one parameterized statement, committed immediately
//! - Foreign keys are enforced; the junction follows renames and deletes
//!
//! There are no migrations. A database created by another schema version
//! is refused instead of silently rebuilt, because it holds user data.

mod queries;
mod schema;
mod types;

pub use types::*;

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::core::entity::ValidationError;

/// Default database location within a project
pub const DATABASE_FILE: &str = ".minv/inventory.db";

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Tables holding inventory data, in dependency order
pub const INVENTORY_TABLES: &[&str] = &[
    "material_types",
    "materials",
    "product_types",
    "products",
    "product_materials",
    "partners",
];

/// Errors raised by the persistence gateway
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("database error: {0}")]
    #[diagnostic(code(minv::db::sqlite))]
    Sqlite(#[from] rusqlite::Error),

    #[error("{kind} '{key}' not found")]
    #[diagnostic(code(minv::db::not_found))]
    NotFound { kind: &'static str, key: String },

    #[error("cannot write {kind} '{key}': {message}")]
    #[diagnostic(
        code(minv::db::constraint),
        help("names must be unique, referenced types must exist, and types still in use cannot be removed")
    )]
    Constraint {
        kind: &'static str,
        key: String,
        message: String,
    },

    #[error("database schema version {found} is not supported (expected {expected})")]
    #[diagnostic(code(minv::db::schema_version))]
    SchemaMismatch { found: i32, expected: i32 },

    #[error("IO error: {0}")]
    #[diagnostic(code(minv::db::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Invalid(#[from] ValidationError),
}

impl StoreError {
    /// Classify a failed write, separating constraint violations from other failures
    fn from_write(err: rusqlite::Error, kind: &'static str, key: &str) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref inner, ref message)
                if inner.code == ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint {
                    kind,
                    key: key.to_string(),
                    message: message.clone().unwrap_or_else(|| inner.to_string()),
                }
            }
            other => StoreError::Sqlite(other),
        }
    }

    /// Log a failed read before handing it back to the caller
    fn from_read(err: rusqlite::Error, what: &str) -> Self {
        error!(query = what, error = %err, "database read failed");
        StoreError::Sqlite(err)
    }
}

/// The inventory database
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open or create the database at `path`
    ///
    /// A fresh file gets the schema; an existing one must carry the
    /// current schema version.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        info!(path = %path.display(), "opening inventory database");
        let conn = Connection::open(path)?;
        Self::configure(conn, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database (tests, dry runs)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::configure(conn, None)
    }

    fn configure(conn: Connection, path: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let mut db = Self { conn, path };

        match db.schema_version()? {
            None => db.init_schema()?,
            Some(SCHEMA_VERSION) => {}
            Some(found) => {
                return Err(StoreError::SchemaMismatch {
                    found,
                    expected: SCHEMA_VERSION,
                })
            }
        }

        Ok(db)
    }

    /// Read the recorded schema version, if the database has been initialized
    fn schema_version(&self) -> Result<Option<i32>, StoreError> {
        let has_table: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            [],
            |row| row.get(0),
        )?;

        if !has_table {
            return Ok(None);
        }

        let version = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(version)
    }

    /// Close the connection, reporting any error SQLite raises while doing so
    pub fn close(self) -> Result<(), StoreError> {
        debug!("closing inventory database");
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }

    /// Location of the database file (None for in-memory databases)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Names of all user tables in the schema
    pub fn table_names(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .map_err(|e| StoreError::from_read(e, "table names"))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| StoreError::from_read(e, "table names"))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| StoreError::from_read(e, "table names"))
    }

    /// Row counts for every inventory table plus the file size
    pub fn statistics(&self) -> Result<DbStatistics, StoreError> {
        let mut tables = Vec::with_capacity(INVENTORY_TABLES.len());

        for table in INVENTORY_TABLES {
            let rows: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })
                .map_err(|e| StoreError::from_read(e, table))?;
            tables.push(TableCount {
                table: (*table).to_string(),
                rows: rows as usize,
            });
        }

        let db_size_bytes = self
            .path
            .as_ref()
            .and_then(|p| fs::metadata(p).ok())
            .map(|m| m.len());

        Ok(DbStatistics {
            path: self.path.clone(),
            schema_version: SCHEMA_VERSION,
            tables,
            db_size_bytes,
        })
    }

    /// Record the schema version (called once after the tables exist)
    fn write_schema_version(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
