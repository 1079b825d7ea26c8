//! Top-level error type for a scan run

use crate::services::file_scanner::ScanError;
use crate::services::filename_parser::SchemaError;
use thiserror::Error;

/// Result type for scan runs
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors; per-file problems are logged and never surface here
#[derive(Debug, Error)]
pub enum Error {
    /// Root directory unusable
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Filename schema rejected
    #[error("Invalid filename format: {0}")]
    Schema(#[from] SchemaError),

    /// Database connection could not be opened
    #[error("Unable to connect to database: {0}")]
    Connect(#[source] mp3scan_common::Error),

    /// Track table could not be created
    #[error("Unable to create table: {0}")]
    CreateTable(#[source] mp3scan_common::Error),

    /// Configuration or database layer error
    #[error(transparent)]
    Common(#[from] mp3scan_common::Error),

    /// Command line and config file do not describe a runnable scan
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
