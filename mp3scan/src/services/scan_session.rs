//! Scan session
//!
//! Runs the two-pass protocol against one persistence sink: count the
//! audio files, then resolve and store each one.

use crate::db::PersistenceSink;
use crate::error::{Error, Result};
use crate::services::file_scanner::{AudioFile, FileScanner, FileVisitor, ScanMode, TraversalState};
use crate::services::metadata_resolver::{MetadataResolver, TagOrigin};
use crate::services::size_accumulator::SizeAccumulator;
use crate::types::{MergedRecord, PathMode};
use mp3scan_common::human_size::HumanSize;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Outcome of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSummary {
    /// Files seen by the count pass
    pub files_found: usize,
    /// Files routed through resolution
    pub files_processed: usize,
    pub records_stored: usize,
    pub insert_failures: usize,
    /// Records whose tags came from the filename schema
    pub from_filename: usize,
    /// Records stored with all four fields empty
    pub untagged: usize,
    /// Field conflicts settled by the merger
    pub conflicts: usize,
    pub total_bytes: u64,
    /// Total size, when size reporting is enabled
    pub total_size: Option<HumanSize>,
}

/// One scan of one root directory
pub struct ScanSession {
    root: PathBuf,
    scanner: FileScanner,
    resolver: MetadataResolver,
    path_mode: PathMode,
    report_size: bool,
    verbose: bool,
}

impl ScanSession {
    pub fn new(root: impl Into<PathBuf>, scanner: FileScanner, resolver: MetadataResolver) -> Self {
        Self {
            root: root.into(),
            scanner,
            resolver,
            path_mode: PathMode::default(),
            report_size: false,
            verbose: false,
        }
    }

    pub fn path_mode(mut self, path_mode: PathMode) -> Self {
        self.path_mode = path_mode;
        self
    }

    /// Log the total size of all processed files at the end of the run
    pub fn report_size(mut self, report_size: bool) -> Self {
        self.report_size = report_size;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run both passes; the sink is closed on every path after a successful open
    ///
    /// # Arguments
    /// * `sink` - Backend receiving one record per processed file
    ///
    /// # Returns
    /// Counts of files found and stored plus the total size of every file
    /// processed. A tree without MP3 files gives a summary with zero counts.
    /// A record the sink rejects is counted in `insert_failures`.
    ///
    /// # Errors
    /// * [`Error::Connect`] when the sink cannot be opened
    /// * [`Error::CreateTable`] when the table cannot be created
    /// * [`Error::Scan`] when the root cannot be walked
    /// * [`Error::Common`] when closing the sink fails
    pub fn run(&mut self, sink: &mut dyn PersistenceSink) -> Result<ScanSummary> {
        sink.open().map_err(Error::Connect)?;
        debug!(backend = sink.backend_name(), "Database opened");

        if let Err(e) = sink.create_schema() {
            close_after_failure(sink);
            return Err(Error::CreateTable(e));
        }

        let result = self.scan_into(sink);
        match result {
            Ok(summary) => {
                sink.close()?;
                Ok(summary)
            }
            Err(e) => {
                close_after_failure(sink);
                Err(e)
            }
        }
    }

    fn scan_into(&mut self, sink: &mut dyn PersistenceSink) -> Result<ScanSummary> {
        let mut count_state = TraversalState::new(ScanMode::CountOnly);
        let files_found = self.scanner.scan(&self.root, &mut count_state, &mut ())?;

        let mut summary = ScanSummary {
            files_found,
            ..Default::default()
        };

        if files_found == 0 {
            error!("No MP3 file found");
            return Ok(summary);
        }

        info!("Found {} MP3 files in {}", files_found, self.root.display());

        let mut writer = RecordWriter {
            resolver: &mut self.resolver,
            sink,
            path_mode: self.path_mode,
            verbose: self.verbose,
            sizes: SizeAccumulator::new(),
            summary: &mut summary,
        };
        let mut process_state = TraversalState::new(ScanMode::Process);
        self.scanner
            .scan(&self.root, &mut process_state, &mut writer)?;

        let total_bytes = writer.sizes.total_bytes();
        let report = writer.sizes.report();
        summary.total_bytes = total_bytes;

        if self.report_size {
            info!("Total files size: {}", report);
            summary.total_size = Some(report);
        }

        info!(
            processed = summary.files_processed,
            stored = summary.records_stored,
            failed = summary.insert_failures,
            "Scan complete"
        );

        Ok(summary)
    }
}

fn close_after_failure(sink: &mut dyn PersistenceSink) {
    if let Err(e) = sink.close() {
        warn!("Failed to close {} database: {}", sink.backend_name(), e);
    }
}

/// Process-pass visitor: resolve each file and hand the record to the sink
struct RecordWriter<'a> {
    resolver: &'a mut MetadataResolver,
    sink: &'a mut dyn PersistenceSink,
    path_mode: PathMode,
    verbose: bool,
    sizes: SizeAccumulator,
    summary: &'a mut ScanSummary,
}

impl FileVisitor for RecordWriter<'_> {
    fn visit(&mut self, file: &AudioFile<'_>) {
        self.sizes.add(file.size);
        self.summary.files_processed += 1;

        let resolution = self.resolver.resolve(file.path, file.file_name);
        self.summary.conflicts += resolution.conflicts;
        match resolution.origin {
            TagOrigin::Tags => {}
            TagOrigin::FileName => self.summary.from_filename += 1,
            TagOrigin::None => self.summary.untagged += 1,
        }

        let path = match self.path_mode {
            PathMode::Relative => file.relative_dir.to_string(),
            PathMode::Absolute => file.absolute_dir.display().to_string(),
        };

        let record = MergedRecord {
            tags: resolution.tags,
            file_name: file.file_name.to_string(),
            path,
            size_bytes: file.size,
        };

        match self.sink.insert(&record) {
            Ok(()) => self.summary.records_stored += 1,
            Err(e) => {
                self.summary.insert_failures += 1;
                if self.verbose {
                    warn!("Unable to store {}: {}", file.file_name, e);
                } else {
                    debug!(file = %file.file_name, error = %e, "Insert failed");
                }
            }
        }
    }
}
