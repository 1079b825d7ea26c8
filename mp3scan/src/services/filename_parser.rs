//! Filename schema parser
//!
//! Decomposes a filename into metadata fields according to a user-supplied
//! schema such as `AT-`: field characters (`A` artist, `T` title, `M` album,
//! `Y` year) followed by the separator character, which is always the last
//! character of the schema.
//!
//! Each field but the last ends at the next separator. The last field ends
//! four characters before the end of the name, dropping a `.mp3` style
//! extension. If the separator is missing for an earlier field, that field
//! takes the last-field rule and the remaining fields stay empty.

use crate::types::{MergedTags, MetadataField, TagValue};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Characters assumed to form the extension suffix
const EXTENSION_LEN: usize = 4;

/// Filename schema errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Bad filename format: schema is empty")]
    Empty,

    #[error("Bad filename format '{0}': no field characters before the separator")]
    NoFields(String),

    #[error("Bad filename format '{schema}': invalid character '{found}' at position {position}")]
    InvalidCharacter {
        schema: String,
        found: char,
        position: usize,
    },
}

/// Ordered field sequence plus separator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNameSchema {
    fields: Vec<MetadataField>,
    separator: char,
    raw: String,
}

impl FileNameSchema {
    /// Parse a schema string; the final character is the separator
    pub fn parse(schema: &str) -> Result<Self, SchemaError> {
        let separator = schema.chars().last().ok_or(SchemaError::Empty)?;
        let body_len = schema.chars().count() - 1;

        let mut fields = Vec::with_capacity(body_len);
        for (position, c) in schema.chars().take(body_len).enumerate() {
            if c == separator {
                continue;
            }
            match MetadataField::from_schema_char(c) {
                Some(field) => fields.push(field),
                None => {
                    return Err(SchemaError::InvalidCharacter {
                        schema: schema.to_string(),
                        found: c,
                        position,
                    })
                }
            }
        }

        if fields.is_empty() {
            return Err(SchemaError::NoFields(schema.to_string()));
        }

        Ok(Self {
            fields,
            separator,
            raw: schema.to_string(),
        })
    }

    pub fn fields(&self) -> &[MetadataField] {
        &self.fields
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for FileNameSchema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FileNameSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Best-effort filename to field parser
#[derive(Debug, Clone)]
pub struct FilenameParser {
    schema: FileNameSchema,
    space_chars: Vec<char>,
}

impl FilenameParser {
    /// Create a parser; every character of `space_chars` is read as a space
    pub fn new(schema: FileNameSchema, space_chars: Option<&str>) -> Self {
        Self {
            schema,
            space_chars: space_chars.map(|s| s.chars().collect()).unwrap_or_default(),
        }
    }

    pub fn schema(&self) -> &FileNameSchema {
        &self.schema
    }

    /// Extract the schema's fields from `file_name`; other fields stay empty
    ///
    /// # Arguments
    /// * `file_name` - Bare file name including its 4-character extension
    ///
    /// # Returns
    /// Tags holding one segment per schema field. The last field ends at the
    /// extension. Fields past a missing separator stay empty.
    ///
    /// # Errors
    /// None. A name that does not match the schema yields partial or empty
    /// fields instead of an error.
    pub fn parse(&self, file_name: &str) -> MergedTags {
        let buffer: Vec<char> = file_name
            .chars()
            .map(|c| if self.space_chars.contains(&c) { ' ' } else { c })
            .collect();
        let terminal_end = buffer.len().saturating_sub(EXTENSION_LEN);
        let last_index = self.schema.fields.len() - 1;

        let mut tags = MergedTags::default();
        let mut start = 0;

        for (index, &field) in self.schema.fields.iter().enumerate() {
            let separator_at = if index == last_index {
                None
            } else {
                buffer
                    .get(start..)
                    .and_then(|rest| rest.iter().position(|&c| c == self.schema.separator))
                    .map(|offset| start + offset)
            };

            let end = separator_at.unwrap_or(terminal_end);
            tags.set(field, assign(field, segment(&buffer, start, end)));

            match separator_at {
                Some(position) => start = position + 1,
                None => break,
            }
        }

        tags
    }
}

/// Characters in `start..end` with leading spaces stripped; empty when the range is inverted
fn segment(buffer: &[char], start: usize, end: usize) -> String {
    if start >= end {
        return String::new();
    }
    buffer[start..end]
        .iter()
        .skip_while(|&&c| c == ' ')
        .collect()
}

/// Bound a raw segment; a single trailing space of a text field is dropped
///
/// A text field cut at its bound never ends in the space it was cut at.
fn assign(field: MetadataField, raw: String) -> TagValue {
    if field == MetadataField::Year {
        return TagValue::new(field, &raw);
    }

    let text = raw.strip_suffix(' ').unwrap_or(&raw);
    let bounded = TagValue::new(field, text);
    if bounded.as_str().len() == text.len() {
        return bounded;
    }

    match bounded.as_str().strip_suffix(' ') {
        Some(trimmed) => TagValue::new(field, trimmed),
        None => bounded,
    }
}
