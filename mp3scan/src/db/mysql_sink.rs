//! MySQL sink

use super::{not_open, sink_runtime, track_row, PersistenceSink};
use crate::types::MergedRecord;
use mp3scan_common::db::{self, TableName};
use mp3scan_common::Result;
use sqlx::MySqlPool;
use tokio::runtime::Runtime;
use tracing::debug;

/// Stores records on a MySQL server
pub struct MySqlSink {
    host: String,
    user: String,
    password: Option<String>,
    database: String,
    table: TableName,
    runtime: Runtime,
    pool: Option<MySqlPool>,
}

impl MySqlSink {
    pub fn new(
        host: String,
        user: String,
        password: Option<String>,
        database: String,
        table: TableName,
    ) -> Result<Self> {
        Ok(Self {
            host,
            user,
            password,
            database,
            table,
            runtime: sink_runtime()?,
            pool: None,
        })
    }

    fn pool(&self) -> Result<&MySqlPool> {
        self.pool.as_ref().ok_or_else(|| not_open(self.backend_name()))
    }
}

impl PersistenceSink for MySqlSink {
    fn open(&mut self) -> Result<()> {
        let pool = self.runtime.block_on(db::connect_mysql(
            &self.host,
            &self.user,
            self.password.as_deref(),
            &self.database,
        ))?;
        self.pool = Some(pool);
        Ok(())
    }

    fn create_schema(&mut self) -> Result<()> {
        let pool = self.pool()?;
        self.runtime
            .block_on(db::create_track_table_mysql(pool, &self.table))
    }

    fn insert(&mut self, record: &MergedRecord) -> Result<()> {
        let pool = self.pool()?;
        self.runtime
            .block_on(db::insert_track_mysql(pool, &self.table, &track_row(record)))
    }

    fn close(&mut self) -> Result<()> {
        if let Some(pool) = self.pool.take() {
            self.runtime.block_on(pool.close());
            debug!("Closed MySQL connection to {}/{}", self.host, self.database);
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mysql"
    }
}
