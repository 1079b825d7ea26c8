//! Tag source readers
//!
//! Each reader handles one embedded tag standard and returns the raw field
//! values it found. A file without a tag of that standard is not an error:
//! the reader returns an empty result.

pub mod id3_extractor;

pub use id3_extractor::{Id3v1Extractor, Id3v2Extractor};

use crate::types::{TagSourceResult, TagStandard};
use std::path::Path;
use thiserror::Error;

/// Tag extraction errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag present but malformed
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Reader for one tag standard
pub trait TagSource {
    /// Standard this reader extracts
    fn standard(&self) -> TagStandard;

    /// Read the fields stored under this standard.
    ///
    /// Absent tags and absent fields yield an empty result, not an error.
    fn read_tags(&self, path: &Path) -> Result<TagSourceResult, ExtractionError>;
}

/// Construct the reader for a tag standard
pub fn source_for(standard: TagStandard) -> Box<dyn TagSource> {
    match standard {
        TagStandard::Id3v1 => Box::new(Id3v1Extractor::new()),
        TagStandard::Id3v2 => Box::new(Id3v2Extractor::new()),
    }
}
