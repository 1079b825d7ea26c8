//! # mp3scan
//!
//! Walks a directory tree, reads the ID3v1 and ID3v2 tags of every MP3 file,
//! reconciles them field by field (optionally falling back to the filename)
//! and stores one record per file in SQLite or MySQL.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod fusion;
pub mod services;
pub mod types;

pub use config::{Args, ScanConfig};
pub use error::{Error, Result};
