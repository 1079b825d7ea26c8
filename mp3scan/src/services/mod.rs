//! Scan pipeline services

pub mod file_scanner;
pub mod filename_parser;
pub mod metadata_resolver;
pub mod scan_session;
pub mod size_accumulator;

pub use file_scanner::{
    is_audio_file_name, AudioFile, FileScanner, FileVisitor, ScanError, ScanMode, TraversalState,
};
pub use filename_parser::{FileNameSchema, FilenameParser, SchemaError};
pub use metadata_resolver::{MetadataResolver, Resolution, TagOrigin};
pub use scan_session::{ScanSession, ScanSummary};
pub use size_accumulator::SizeAccumulator;
