//! # mp3scan Common Library
//!
//! Shared code for the mp3scan workspace:
//! - Error type used by configuration and database layers
//! - TOML configuration file loading and location resolution
//! - Database connection setup and table DDL for the track table
//! - Human-readable byte size formatting

pub mod config;
pub mod db;
pub mod error;
pub mod human_size;

pub use error::{Error, Result};
