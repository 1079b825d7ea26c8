//! ID3v1 and ID3v2 readers built on the `id3` crate
//!
//! The two standards are read independently so that the merger can compare
//! them field by field. ID3v1 fields are fixed-width and padded with NULs or
//! spaces; the padding is stripped before the value is bounded.

use super::{ExtractionError, TagSource};
use crate::types::{MetadataField, TagSourceResult, TagStandard};
use id3::TagLike;
use std::path::Path;
use tracing::debug;

/// Size of the ID3v1 trailer at the end of a file
const ID3V1_TAG_LEN: u64 = 128;

/// ID3v1 reader (primary source)
#[derive(Debug, Default, Clone, Copy)]
pub struct Id3v1Extractor;

impl Id3v1Extractor {
    pub fn new() -> Self {
        Self
    }
}

impl TagSource for Id3v1Extractor {
    fn standard(&self) -> TagStandard {
        TagStandard::Id3v1
    }

    fn read_tags(&self, path: &Path) -> Result<TagSourceResult, ExtractionError> {
        let mut result = TagSourceResult::new(TagStandard::Id3v1);

        // Files shorter than the trailer cannot carry one
        if std::fs::metadata(path)?.len() < ID3V1_TAG_LEN {
            debug!(file = ?path, "File too short for an ID3v1 tag");
            return Ok(result);
        }

        let tag = match id3::v1::Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(e) => return no_tag_or_error(e, path, result),
        };

        result.set(MetadataField::Title, strip_padding(&tag.title));
        result.set(MetadataField::Artist, strip_padding(&tag.artist));
        result.set(MetadataField::Album, strip_padding(&tag.album));
        result.set(MetadataField::Year, strip_padding(&tag.year));

        Ok(result)
    }
}

/// ID3v2 reader (secondary source)
#[derive(Debug, Default, Clone, Copy)]
pub struct Id3v2Extractor;

impl Id3v2Extractor {
    pub fn new() -> Self {
        Self
    }
}

impl TagSource for Id3v2Extractor {
    fn standard(&self) -> TagStandard {
        TagStandard::Id3v2
    }

    fn read_tags(&self, path: &Path) -> Result<TagSourceResult, ExtractionError> {
        let result = TagSourceResult::new(TagStandard::Id3v2);

        let tag = match id3::Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(e) => return no_tag_or_error(e, path, result),
        };

        // TYER first, then the year of TDRC for v2.4 tags
        let year = tag
            .year()
            .or_else(|| tag.date_recorded().map(|date| date.year))
            .map(|year| year.to_string());

        let result = result
            .with(MetadataField::Title, tag.title().unwrap_or_default())
            .with(MetadataField::Artist, tag.artist().unwrap_or_default())
            .with(MetadataField::Album, tag.album().unwrap_or_default())
            .with(MetadataField::Year, year.as_deref().unwrap_or_default());

        Ok(result)
    }
}

/// Map "no tag here" to an empty result and everything else to an error
fn no_tag_or_error(
    error: id3::Error,
    path: &Path,
    empty: TagSourceResult,
) -> Result<TagSourceResult, ExtractionError> {
    match error.kind {
        id3::ErrorKind::NoTag => {
            debug!(file = ?path, standard = %empty.standard(), "No tag found");
            Ok(empty)
        }
        id3::ErrorKind::Io(ref io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
            debug!(file = ?path, standard = %empty.standard(), "File ends before a tag header");
            Ok(empty)
        }
        id3::ErrorKind::Io(io) => Err(ExtractionError::Io(io)),
        _ => Err(ExtractionError::Parse(format!(
            "Failed to read {} tag: {}",
            empty.standard(),
            error
        ))),
    }
}

/// Drop the NUL and space padding of a fixed-width ID3v1 field
fn strip_padding(text: &str) -> &str {
    text.trim_end_matches(|c: char| c == '\0' || c == ' ')
}
