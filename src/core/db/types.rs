//! Store type definitions
//!
//! Result structs returned by status queries.

use std::path::PathBuf;

use serde::Serialize;

/// Row count for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: String,
    pub rows: usize,
}

/// Database-wide statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStatistics {
    pub path: Option<PathBuf>,
    pub schema_version: i32,
    pub tables: Vec<TableCount>,
    pub db_size_bytes: Option<u64>,
}

impl DbStatistics {
    /// Total rows across all inventory tables
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }

    /// Row count for a named table
    pub fn rows_in(&self, table: &str) -> Option<usize> {
        self.tables.iter().find(|t| t.table == table).map(|t| t.rows)
    }
}
