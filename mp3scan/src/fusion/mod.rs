//! Tag fusion: reconciling the values of two tag standards

pub mod conflict_prompt;
pub mod tag_merger;

pub use conflict_prompt::ConsolePrompt;
pub use tag_merger::{
    merge_field, ConflictChoice, ConflictResolver, FieldConflict, FieldMerge, MergeOutcome,
    TagMerger,
};
