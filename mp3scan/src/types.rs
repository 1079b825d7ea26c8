//! Core data model for tag resolution
//!
//! Text values are bounded per field (30 characters for title, artist and
//! album; 4 for year). Longer input is truncated, never rejected. Lengths are
//! counted in characters so truncation never splits a UTF-8 sequence.

use std::collections::BTreeMap;
use std::fmt;

/// Metadata fields resolved for every file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataField {
    Title,
    Artist,
    Album,
    Year,
}

impl MetadataField {
    /// All fields, in resolution order
    pub const ALL: [MetadataField; 4] = [
        MetadataField::Title,
        MetadataField::Artist,
        MetadataField::Album,
        MetadataField::Year,
    ];

    /// Maximum stored length in characters
    pub fn max_len(self) -> usize {
        match self {
            MetadataField::Year => 4,
            _ => 30,
        }
    }

    /// Lowercase name used in prompts and log messages
    pub fn name(self) -> &'static str {
        match self {
            MetadataField::Title => "title",
            MetadataField::Artist => "artist",
            MetadataField::Album => "album",
            MetadataField::Year => "year",
        }
    }

    /// Map a filename schema character (`T`, `A`, `M`, `Y`) to its field
    pub fn from_schema_char(c: char) -> Option<Self> {
        match c {
            'T' => Some(MetadataField::Title),
            'A' => Some(MetadataField::Artist),
            'M' => Some(MetadataField::Album),
            'Y' => Some(MetadataField::Year),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bounded text value; empty means "absent"
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TagValue(String);

impl TagValue {
    /// Bound `text` to the field's maximum length
    pub fn new(field: MetadataField, text: &str) -> Self {
        let max = field.max_len();
        match text.char_indices().nth(max) {
            Some((cut, _)) => Self(text[..cut].to_string()),
            None => Self(text.to_string()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Embedded tag standards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagStandard {
    /// Primary source
    Id3v1,
    /// Secondary source
    Id3v2,
}

impl TagStandard {
    /// Parse a configuration label (`v1`, `v2`, `id3v1`, `id3v2`; case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "v1" | "id3v1" => Some(TagStandard::Id3v1),
            "v2" | "id3v2" => Some(TagStandard::Id3v2),
            _ => None,
        }
    }
}

impl fmt::Display for TagStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagStandard::Id3v1 => f.write_str("ID3v1"),
            TagStandard::Id3v2 => f.write_str("ID3v2"),
        }
    }
}

/// Values produced by one tag source for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSourceResult {
    standard: TagStandard,
    values: BTreeMap<MetadataField, TagValue>,
}

impl TagSourceResult {
    pub fn new(standard: TagStandard) -> Self {
        Self {
            standard,
            values: BTreeMap::new(),
        }
    }

    /// Store a bounded value; empty text leaves the field absent
    pub fn set(&mut self, field: MetadataField, text: &str) {
        let value = TagValue::new(field, text);
        if value.is_empty() {
            self.values.remove(&field);
        } else {
            self.values.insert(field, value);
        }
    }

    /// Builder-style `set`
    pub fn with(mut self, field: MetadataField, text: &str) -> Self {
        self.set(field, text);
        self
    }

    pub fn standard(&self) -> TagStandard {
        self.standard
    }

    /// Value for `field`, or `None` when the source had nothing
    pub fn get(&self, field: MetadataField) -> Option<&TagValue> {
        self.values.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Exactly one resolved value per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedTags {
    pub title: TagValue,
    pub artist: TagValue,
    pub album: TagValue,
    pub year: TagValue,
}

impl MergedTags {
    pub fn get(&self, field: MetadataField) -> &TagValue {
        match field {
            MetadataField::Title => &self.title,
            MetadataField::Artist => &self.artist,
            MetadataField::Album => &self.album,
            MetadataField::Year => &self.year,
        }
    }

    pub fn set(&mut self, field: MetadataField, value: TagValue) {
        match field {
            MetadataField::Title => self.title = value,
            MetadataField::Artist => self.artist = value,
            MetadataField::Album => self.album = value,
            MetadataField::Year => self.year = value,
        }
    }

    /// True when all four fields are empty
    pub fn is_empty(&self) -> bool {
        MetadataField::ALL.iter().all(|&field| self.get(field).is_empty())
    }
}

/// Which directory form is stored with each record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMode {
    /// Path relative to the scan root (`""`, `"a/"`, `"a/b/"`)
    Relative,
    /// Canonical absolute directory
    #[default]
    Absolute,
}

/// Finished record handed to the persistence sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRecord {
    pub tags: MergedTags,
    pub file_name: String,
    pub path: String,
    pub size_bytes: u64,
}
