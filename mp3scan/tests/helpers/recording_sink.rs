//! In-memory persistence sink

use mp3scan::db::PersistenceSink;
use mp3scan::types::MergedRecord;
use mp3scan_common::{Error, Result};

/// Step at which the sink fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailAt {
    Open,
    CreateSchema,
    /// Inserts of this file name fail
    Insert(String),
}

/// Sink that keeps every record and the sequence of calls
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub records: Vec<MergedRecord>,
    pub calls: Vec<&'static str>,
    fail_at: Option<FailAt>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(fail_at: FailAt) -> Self {
        Self {
            fail_at: Some(fail_at),
            ..Self::default()
        }
    }

    pub fn record(&self, file_name: &str) -> Option<&MergedRecord> {
        self.records.iter().find(|r| r.file_name == file_name)
    }

    fn fails(&self, step: &FailAt) -> bool {
        self.fail_at.as_ref() == Some(step)
    }
}

fn injected(step: &str) -> Error {
    Error::InvalidInput(format!("injected {} failure", step))
}

impl PersistenceSink for RecordingSink {
    fn open(&mut self) -> Result<()> {
        self.calls.push("open");
        if self.fails(&FailAt::Open) {
            return Err(injected("open"));
        }
        Ok(())
    }

    fn create_schema(&mut self) -> Result<()> {
        self.calls.push("create_schema");
        if self.fails(&FailAt::CreateSchema) {
            return Err(injected("create_schema"));
        }
        Ok(())
    }

    fn insert(&mut self, record: &MergedRecord) -> Result<()> {
        self.calls.push("insert");
        if self.fails(&FailAt::Insert(record.file_name.clone())) {
            return Err(injected("insert"));
        }
        self.records.push(record.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.calls.push("close");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
