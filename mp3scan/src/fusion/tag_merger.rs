//! Tag Merger
//!
//! Combines the primary (ID3v1) and secondary (ID3v2) results for one file.
//! Each field is resolved on its own:
//! 1. Primary empty: take the secondary value (possibly empty)
//! 2. Both present and equal: take that value
//! 3. Both present and different: ask the injected resolver when interactive,
//!    otherwise keep the primary value
//!
//! Four fields with conflicts mean four separate decisions.

use crate::types::{MergedTags, MetadataField, TagSourceResult, TagValue};
use tracing::debug;

/// Operator's pick between two conflicting candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Candidate from the primary source
    First,
    /// Candidate from the secondary source
    Second,
}

/// Decides conflicts between two non-empty, different values
pub trait ConflictResolver {
    fn choose(
        &mut self,
        field: MetadataField,
        file_name: &str,
        first: &str,
        second: &str,
    ) -> ConflictChoice;
}

/// One conflict and how it was settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConflict {
    pub field: MetadataField,
    pub primary: TagValue,
    pub secondary: TagValue,
    pub choice: ConflictChoice,
}

/// Merged tags plus the conflicts met along the way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub tags: MergedTags,
    pub conflicts: Vec<FieldConflict>,
}

/// Field-wise merger of two tag sources
#[derive(Default)]
pub struct TagMerger {
    resolver: Option<Box<dyn ConflictResolver>>,
}

impl TagMerger {
    /// Deterministic merger: the primary source wins every conflict
    pub fn new() -> Self {
        Self { resolver: None }
    }

    /// Interactive merger: conflicts are handed to `resolver`
    pub fn interactive(resolver: Box<dyn ConflictResolver>) -> Self {
        Self {
            resolver: Some(resolver),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.resolver.is_some()
    }

    /// Merge up to two source results for `file_name`
    pub fn merge(
        &mut self,
        primary: Option<&TagSourceResult>,
        secondary: Option<&TagSourceResult>,
        file_name: &str,
    ) -> MergeOutcome {
        let empty = TagValue::empty();
        let mut outcome = MergeOutcome::default();

        for field in MetadataField::ALL {
            let first = primary.and_then(|r| r.get(field)).unwrap_or(&empty);
            let second = secondary.and_then(|r| r.get(field)).unwrap_or(&empty);

            let value = match merge_field(first, second) {
                FieldMerge::Resolved(value) => value,
                FieldMerge::Conflict => {
                    let choice = match self.resolver.as_mut() {
                        Some(resolver) => {
                            resolver.choose(field, file_name, first.as_str(), second.as_str())
                        }
                        None => ConflictChoice::First,
                    };

                    debug!(
                        file = %file_name,
                        field = %field,
                        primary = %first,
                        secondary = %second,
                        choice = ?choice,
                        "Tag conflict resolved"
                    );
                    outcome.conflicts.push(FieldConflict {
                        field,
                        primary: first.clone(),
                        secondary: second.clone(),
                        choice,
                    });

                    match choice {
                        ConflictChoice::First => first.clone(),
                        ConflictChoice::Second => second.clone(),
                    }
                }
            };

            outcome.tags.set(field, value);
        }

        outcome
    }
}

/// Result of the per-field rule before any operator involvement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMerge {
    /// Value settled without a decision (possibly empty)
    Resolved(TagValue),
    /// Both values present and different
    Conflict,
}

/// Apply the merge rule to one field
pub fn merge_field(primary: &TagValue, secondary: &TagValue) -> FieldMerge {
    if primary.is_empty() {
        FieldMerge::Resolved(secondary.clone())
    } else if secondary.is_empty() || primary == secondary {
        FieldMerge::Resolved(primary.clone())
    } else {
        FieldMerge::Conflict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagStandard;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Resolver that replays scripted answers and records every question
    struct ScriptedResolver {
        answers: Vec<ConflictChoice>,
        asked: Rc<RefCell<Vec<(MetadataField, String, String)>>>,
    }

    impl ConflictResolver for ScriptedResolver {
        fn choose(
            &mut self,
            field: MetadataField,
            _file_name: &str,
            first: &str,
            second: &str,
        ) -> ConflictChoice {
            self.asked
                .borrow_mut()
                .push((field, first.to_string(), second.to_string()));
            if self.answers.is_empty() {
                ConflictChoice::First
            } else {
                self.answers.remove(0)
            }
        }
    }

    fn v1() -> TagSourceResult {
        TagSourceResult::new(TagStandard::Id3v1)
    }

    fn v2() -> TagSourceResult {
        TagSourceResult::new(TagStandard::Id3v2)
    }

    fn value(field: MetadataField, text: &str) -> TagValue {
        TagValue::new(field, text)
    }

    #[test]
    fn test_primary_empty_takes_secondary() {
        let secondary = v2()
            .with(MetadataField::Title, "Title")
            .with(MetadataField::Artist, "Artist")
            .with(MetadataField::Album, "Album")
            .with(MetadataField::Year, "1999");

        let outcome = TagMerger::new().merge(Some(&v1()), Some(&secondary), "a.mp3");
        for field in MetadataField::ALL {
            assert_eq!(outcome.tags.get(field), secondary.get(field).unwrap());
        }
        assert!(outcome.conflicts.is_empty());
    }

    #[test]
    fn test_identical_values_are_idempotent() {
        let source = v1()
            .with(MetadataField::Title, "Same")
            .with(MetadataField::Year, "2000");
        let mirror = v2()
            .with(MetadataField::Title, "Same")
            .with(MetadataField::Year, "2000");

        let outcome = TagMerger::new().merge(Some(&source), Some(&mirror), "a.mp3");
        assert_eq!(outcome.tags.title.as_str(), "Same");
        assert_eq!(outcome.tags.year.as_str(), "2000");
        assert!(outcome.tags.artist.is_empty());
        assert!(outcome.conflicts.is_empty());
    }

    #[test]
    fn test_primary_wins_trailing_space_variant() {
        let primary = v1().with(MetadataField::Title, "Song");
        let secondary = v2().with(MetadataField::Title, "Song ");

        let outcome = TagMerger::new().merge(Some(&primary), Some(&secondary), "song.mp3");
        assert_eq!(outcome.tags.title.as_str(), "Song");
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].choice, ConflictChoice::First);
    }

    #[test]
    fn test_non_interactive_never_takes_differing_secondary() {
        let primary = v1()
            .with(MetadataField::Title, "T1")
            .with(MetadataField::Artist, "A1")
            .with(MetadataField::Album, "M1")
            .with(MetadataField::Year, "2001");
        let secondary = v2()
            .with(MetadataField::Title, "T2")
            .with(MetadataField::Artist, "A2")
            .with(MetadataField::Album, "M2")
            .with(MetadataField::Year, "2002");

        let outcome = TagMerger::new().merge(Some(&primary), Some(&secondary), "x.mp3");
        for field in MetadataField::ALL {
            assert_eq!(outcome.tags.get(field), primary.get(field).unwrap());
        }
        assert_eq!(outcome.conflicts.len(), 4);
    }

    #[test]
    fn test_secondary_empty_keeps_primary() {
        let primary = v1().with(MetadataField::Album, "Album");
        let outcome = TagMerger::new().merge(Some(&primary), None, "x.mp3");
        assert_eq!(outcome.tags.album.as_str(), "Album");
    }

    #[test]
    fn test_both_empty_stays_empty() {
        let outcome = TagMerger::new().merge(Some(&v1()), Some(&v2()), "x.mp3");
        assert!(outcome.tags.is_empty());

        let outcome = TagMerger::new().merge(None, None, "x.mp3");
        assert!(outcome.tags.is_empty());
    }

    #[test]
    fn test_interactive_asks_once_per_conflicting_field() {
        let asked = Rc::new(RefCell::new(Vec::new()));
        let resolver = ScriptedResolver {
            answers: vec![ConflictChoice::Second, ConflictChoice::First],
            asked: Rc::clone(&asked),
        };
        let mut merger = TagMerger::interactive(Box::new(resolver));
        assert!(merger.is_interactive());

        let primary = v1()
            .with(MetadataField::Title, "Title v1")
            .with(MetadataField::Artist, "Same")
            .with(MetadataField::Year, "1990");
        let secondary = v2()
            .with(MetadataField::Title, "Title v2")
            .with(MetadataField::Artist, "Same")
            .with(MetadataField::Album, "Only v2")
            .with(MetadataField::Year, "1991");

        let outcome = merger.merge(Some(&primary), Some(&secondary), "x.mp3");

        assert_eq!(outcome.tags.title.as_str(), "Title v2");
        assert_eq!(outcome.tags.artist.as_str(), "Same");
        assert_eq!(outcome.tags.album.as_str(), "Only v2");
        assert_eq!(outcome.tags.year.as_str(), "1990");

        let asked = asked.borrow();
        assert_eq!(asked.len(), 2, "Only title and year conflict");
        assert_eq!(asked[0].0, MetadataField::Title);
        assert_eq!(asked[1], (MetadataField::Year, "1990".to_string(), "1991".to_string()));
    }

    #[test]
    fn test_merge_field_rule() {
        let one = value(MetadataField::Artist, "One");
        let two = value(MetadataField::Artist, "Two");
        let empty = TagValue::empty();

        assert_eq!(merge_field(&empty, &two), FieldMerge::Resolved(two.clone()));
        assert_eq!(merge_field(&one, &empty), FieldMerge::Resolved(one.clone()));
        assert_eq!(merge_field(&one, &one), FieldMerge::Resolved(one.clone()));
        assert_eq!(merge_field(&empty, &empty), FieldMerge::Resolved(TagValue::empty()));
        assert_eq!(merge_field(&one, &two), FieldMerge::Conflict);
    }
}
