//! Database support for the track table
//!
//! The table name is interpolated into DDL and DML, so it is validated as a
//! plain SQL identifier up front. Every value is bound as a parameter.

pub mod init;

pub use init::{
    connect_mysql, connect_sqlite, create_track_table_mysql, create_track_table_sqlite,
    insert_track_mysql, insert_track_sqlite,
};

use crate::{Error, Result};
use std::fmt;

/// Table name used when none is configured
pub const DEFAULT_TABLE_NAME: &str = "MP3";

/// Validated SQL table identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Validate a table name: ASCII letters, digits and `_`, not starting with a digit
    pub fn new(name: &str) -> Result<Self> {
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false);

        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::InvalidInput(format!(
                "Invalid table name '{}': use letters, digits and '_' only",
                name
            )));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self(DEFAULT_TABLE_NAME.to_string())
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the track table, borrowed from the caller's record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackRow<'a> {
    pub artist: &'a str,
    pub title: &'a str,
    pub album: &'a str,
    pub year: &'a str,
    pub filename: &'a str,
    pub path: &'a str,
    pub size: i64,
}

/// `INSERT` statement shared by both backends
pub(crate) fn insert_track_sql(table: &TableName) -> String {
    format!(
        "INSERT INTO {} (artist, title, album, year, filename, path, size) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        table
    )
}
