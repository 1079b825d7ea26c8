//! Persistence sinks
//!
//! The scan pipeline is synchronous; each sink owns a current-thread tokio
//! runtime and drives its sqlx pool with `block_on`.

pub mod mysql_sink;
pub mod sqlite_sink;

pub use mysql_sink::MySqlSink;
pub use sqlite_sink::SqliteSink;

use crate::types::MergedRecord;
use mp3scan_common::config::DatabaseConfig;
use mp3scan_common::db::{TableName, TrackRow};
use mp3scan_common::Result;
use tokio::runtime::{Builder, Runtime};

/// Destination for merged records
///
/// Call order: `open`, `create_schema`, any number of `insert`, `close`.
pub trait PersistenceSink {
    /// Connect to the backend
    fn open(&mut self) -> Result<()>;

    /// Create the track table unless it already exists
    fn create_schema(&mut self) -> Result<()>;

    /// Store one record
    fn insert(&mut self, record: &MergedRecord) -> Result<()>;

    /// Release the connection; safe to call more than once
    fn close(&mut self) -> Result<()>;

    /// Short label for log messages
    fn backend_name(&self) -> &'static str;
}

/// Build the sink for a configured backend
pub fn build_sink(config: &DatabaseConfig, table: TableName) -> Result<Box<dyn PersistenceSink>> {
    let sink: Box<dyn PersistenceSink> = match config {
        DatabaseConfig::Sqlite { path } => Box::new(SqliteSink::new(path.clone(), table)?),
        DatabaseConfig::Mysql {
            host,
            user,
            password,
            database,
        } => Box::new(MySqlSink::new(
            host.clone(),
            user.clone(),
            password.clone(),
            database.clone(),
            table,
        )?),
    };
    Ok(sink)
}

/// Runtime used by the blocking sinks
pub(crate) fn sink_runtime() -> Result<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}

/// Borrow a record as a table row
pub(crate) fn track_row(record: &MergedRecord) -> TrackRow<'_> {
    TrackRow {
        artist: record.tags.artist.as_str(),
        title: record.tags.title.as_str(),
        album: record.tags.album.as_str(),
        year: record.tags.year.as_str(),
        filename: &record.file_name,
        path: &record.path,
        size: i64::try_from(record.size_bytes).unwrap_or(i64::MAX),
    }
}

/// Error for calls made before `open`
pub(crate) fn not_open(backend: &str) -> mp3scan_common::Error {
    mp3scan_common::Error::InvalidInput(format!("{} sink used before open", backend))
}
