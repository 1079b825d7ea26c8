//! Per-file metadata resolution
//!
//! Reads every enabled tag source, merges the results and, when the merged
//! tags are entirely empty, falls back to the filename schema parser.

use crate::extractors::TagSource;
use crate::fusion::TagMerger;
use crate::services::filename_parser::FilenameParser;
use crate::types::{MergedTags, TagSourceResult};
use std::path::Path;
use tracing::{debug, warn};

/// Where the resolved tags came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOrigin {
    /// Embedded tags
    Tags,
    /// Filename schema fallback
    FileName,
    /// Nothing usable; all fields empty
    None,
}

/// Resolved tags for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub tags: MergedTags,
    pub origin: TagOrigin,
    pub conflicts: usize,
}

/// Tag sources, merger and optional filename fallback
pub struct MetadataResolver {
    primary: Option<Box<dyn TagSource>>,
    secondary: Option<Box<dyn TagSource>>,
    merger: TagMerger,
    filename_parser: Option<FilenameParser>,
    verbose: bool,
}

impl MetadataResolver {
    /// Create a resolver; either source may be disabled
    pub fn new(
        primary: Option<Box<dyn TagSource>>,
        secondary: Option<Box<dyn TagSource>>,
        merger: TagMerger,
    ) -> Self {
        Self {
            primary,
            secondary,
            merger,
            filename_parser: None,
            verbose: false,
        }
    }

    /// Parse filenames when a file carries no tag metadata
    pub fn with_filename_fallback(mut self, parser: FilenameParser) -> Self {
        self.filename_parser = Some(parser);
        self
    }

    /// Report per-file soft errors as warnings instead of debug messages
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Resolve the tags of the file at `path`
    pub fn resolve(&mut self, path: &Path, file_name: &str) -> Resolution {
        let primary = self
            .primary
            .as_deref()
            .map(|source| read_source(source, path, self.verbose));
        let secondary = self
            .secondary
            .as_deref()
            .map(|source| read_source(source, path, self.verbose));

        let outcome = self
            .merger
            .merge(primary.as_ref(), secondary.as_ref(), file_name);
        let conflicts = outcome.conflicts.len();

        if !outcome.tags.is_empty() {
            return Resolution {
                tags: outcome.tags,
                origin: TagOrigin::Tags,
                conflicts,
            };
        }

        let Some(parser) = &self.filename_parser else {
            if self.verbose {
                warn!("{} has no id3 Tag", file_name);
            } else {
                debug!(file = %file_name, "No tag metadata found");
            }
            return Resolution {
                tags: outcome.tags,
                origin: TagOrigin::None,
                conflicts,
            };
        };

        let tags = parser.parse(file_name);
        let missing: Vec<&str> = parser
            .schema()
            .fields()
            .iter()
            .filter(|&&field| tags.get(field).is_empty())
            .map(|field| field.name())
            .collect();

        if !missing.is_empty() {
            if self.verbose {
                warn!(
                    "{} does not match filename format {} (missing: {})",
                    file_name,
                    parser.schema(),
                    missing.join(", ")
                );
            } else {
                debug!(file = %file_name, missing = ?missing, "Partial filename match");
            }
        }

        let origin = if tags.is_empty() {
            TagOrigin::None
        } else {
            TagOrigin::FileName
        };

        Resolution {
            tags,
            origin,
            conflicts,
        }
    }
}

/// Read one source; failures count as an empty result
fn read_source(source: &dyn TagSource, path: &Path, verbose: bool) -> TagSourceResult {
    match source.read_tags(path) {
        Ok(result) => result,
        Err(e) => {
            if verbose {
                warn!("Unable to read {} tag of {}: {}", source.standard(), path.display(), e);
            } else {
                debug!(file = ?path, standard = %source.standard(), error = %e, "Tag read failed");
            }
            TagSourceResult::new(source.standard())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ExtractionError;
    use crate::services::filename_parser::FileNameSchema;
    use crate::types::{MetadataField, TagStandard};

    /// Source returning a fixed result
    struct FixedSource(TagSourceResult);

    impl TagSource for FixedSource {
        fn standard(&self) -> TagStandard {
            self.0.standard()
        }

        fn read_tags(&self, _path: &Path) -> Result<TagSourceResult, ExtractionError> {
            Ok(self.0.clone())
        }
    }

    /// Source that always fails
    struct BrokenSource;

    impl TagSource for BrokenSource {
        fn standard(&self) -> TagStandard {
            TagStandard::Id3v2
        }

        fn read_tags(&self, _path: &Path) -> Result<TagSourceResult, ExtractionError> {
            Err(ExtractionError::Parse("corrupt frame".to_string()))
        }
    }

    fn fixed(result: TagSourceResult) -> Option<Box<dyn TagSource>> {
        Some(Box::new(FixedSource(result)))
    }

    fn empty_v1() -> TagSourceResult {
        TagSourceResult::new(TagStandard::Id3v1)
    }

    fn at_parser() -> FilenameParser {
        FilenameParser::new(FileNameSchema::parse("AT-").unwrap(), Some("_"))
    }

    #[test]
    fn test_tags_take_precedence_over_filename() {
        let v1 = empty_v1().with(MetadataField::Title, "Tagged");
        let mut resolver = MetadataResolver::new(fixed(v1), None, TagMerger::new())
            .with_filename_fallback(at_parser());

        let resolution = resolver.resolve(Path::new("x"), "Band_-_Song.mp3");
        assert_eq!(resolution.origin, TagOrigin::Tags);
        assert_eq!(resolution.tags.title.as_str(), "Tagged");
        assert!(resolution.tags.artist.is_empty(), "Filename is not consulted when tags exist");
    }

    #[test]
    fn test_filename_fallback_when_all_fields_empty() {
        let mut resolver = MetadataResolver::new(fixed(empty_v1()), None, TagMerger::new())
            .with_filename_fallback(at_parser());

        let resolution = resolver.resolve(Path::new("x"), "Band_-_Song.mp3");
        assert_eq!(resolution.origin, TagOrigin::FileName);
        assert_eq!(resolution.tags.artist.as_str(), "Band");
        assert_eq!(resolution.tags.title.as_str(), "Song");
    }

    #[test]
    fn test_no_fallback_leaves_record_empty() {
        let mut resolver =
            MetadataResolver::new(fixed(empty_v1()), None, TagMerger::new()).verbose(true);

        let resolution = resolver.resolve(Path::new("x"), "Band_-_Song.mp3");
        assert_eq!(resolution.origin, TagOrigin::None);
        assert!(resolution.tags.is_empty());
    }

    #[test]
    fn test_failing_source_counts_as_empty() {
        let v1 = empty_v1().with(MetadataField::Artist, "Band");
        let mut resolver =
            MetadataResolver::new(fixed(v1), Some(Box::new(BrokenSource)), TagMerger::new());

        let resolution = resolver.resolve(Path::new("x"), "file.mp3");
        assert_eq!(resolution.origin, TagOrigin::Tags);
        assert_eq!(resolution.tags.artist.as_str(), "Band");
    }

    #[test]
    fn test_only_secondary_enabled() {
        let v2 = TagSourceResult::new(TagStandard::Id3v2).with(MetadataField::Album, "Record");
        let mut resolver = MetadataResolver::new(None, fixed(v2), TagMerger::new());

        let resolution = resolver.resolve(Path::new("x"), "file.mp3");
        assert_eq!(resolution.tags.album.as_str(), "Record");
        assert_eq!(resolution.conflicts, 0);
    }

    #[test]
    fn test_conflicts_counted() {
        let v1 = empty_v1().with(MetadataField::Title, "Song");
        let v2 = TagSourceResult::new(TagStandard::Id3v2).with(MetadataField::Title, "Song ");
        let mut resolver = MetadataResolver::new(fixed(v1), fixed(v2), TagMerger::new());

        let resolution = resolver.resolve(Path::new("x"), "file.mp3");
        assert_eq!(resolution.tags.title.as_str(), "Song");
        assert_eq!(resolution.conflicts, 1);
    }

    #[test]
    fn test_unmatched_filename_is_none() {
        let mut resolver = MetadataResolver::new(fixed(empty_v1()), None, TagMerger::new())
            .with_filename_fallback(at_parser());

        let resolution = resolver.resolve(Path::new("x"), ".mp3");
        assert_eq!(resolution.origin, TagOrigin::None);
    }
}
