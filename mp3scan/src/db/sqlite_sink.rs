//! SQLite sink

use super::{not_open, sink_runtime, track_row, PersistenceSink};
use crate::types::MergedRecord;
use mp3scan_common::db::{self, TableName};
use mp3scan_common::Result;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::debug;

/// Stores records in a local SQLite file
pub struct SqliteSink {
    path: PathBuf,
    table: TableName,
    runtime: Runtime,
    pool: Option<SqlitePool>,
}

impl SqliteSink {
    pub fn new(path: PathBuf, table: TableName) -> Result<Self> {
        Ok(Self {
            path,
            table,
            runtime: sink_runtime()?,
            pool: None,
        })
    }

    fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or_else(|| not_open(self.backend_name()))
    }
}

impl PersistenceSink for SqliteSink {
    fn open(&mut self) -> Result<()> {
        let pool = self.runtime.block_on(db::connect_sqlite(&self.path))?;
        self.pool = Some(pool);
        Ok(())
    }

    fn create_schema(&mut self) -> Result<()> {
        let pool = self.pool()?;
        self.runtime
            .block_on(db::create_track_table_sqlite(pool, &self.table))
    }

    fn insert(&mut self, record: &MergedRecord) -> Result<()> {
        let pool = self.pool()?;
        self.runtime
            .block_on(db::insert_track_sqlite(pool, &self.table, &track_row(record)))
    }

    fn close(&mut self) -> Result<()> {
        if let Some(pool) = self.pool.take() {
            self.runtime.block_on(pool.close());
            debug!("Closed SQLite database {}", self.path.display());
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
