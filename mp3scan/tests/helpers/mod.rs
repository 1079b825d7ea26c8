//! Test Helper Utilities
//!
//! Shared utilities for testing mp3scan

#![allow(dead_code, unused_imports)]

pub mod db_utils;
pub mod fixtures;
pub mod log_capture;
pub mod recording_sink;

pub use db_utils::{read_tracks, StoredTrack};
pub use fixtures::{write_untagged, write_v1, write_v1_v2, write_v2, TagFixture};
pub use log_capture::LogCapture;
pub use recording_sink::{FailAt, RecordingSink};
