//! Human-readable byte size formatting
//!
//! A byte count is divided by 1024 for as long as it exceeds 1024, stepping
//! through B, KB, MB, GB and TB. Terabytes are the largest unit: totals beyond
//! that keep growing in TB rather than moving to a larger unit.

use std::fmt;

/// Unit labels, smallest first
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Scaling step between consecutive units
const STEP: f64 = 1024.0;

/// A byte count scaled to a display unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumanSize {
    value: f64,
    unit: &'static str,
}

impl HumanSize {
    /// Scale a byte count to the first unit where the value is at or below 1024
    pub fn from_bytes(bytes: u64) -> Self {
        let mut value = bytes as f64;
        let mut index = 0;

        while value > STEP && index < UNITS.len() - 1 {
            value /= STEP;
            index += 1;
        }

        Self {
            value,
            unit: UNITS[index],
        }
    }

    /// Scaled value in `unit()`
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Unit label (`B`, `KB`, `MB`, `GB` or `TB`)
    pub fn unit(&self) -> &'static str {
        self.unit
    }
}

impl fmt::Display for HumanSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} {}", self.value, self.unit)
    }
}

/// Format a byte count with one decimal in the largest fitting unit.
///
/// # Examples
///
/// ```
/// use mp3scan_common::human_size::format_human_size;
///
/// assert_eq!(format_human_size(500), "500.0 B");
/// assert_eq!(format_human_size(1536), "1.5 KB");
/// assert_eq!(format_human_size(1_050_000), "1.0 MB");
/// ```
pub fn format_human_size(bytes: u64) -> String {
    HumanSize::from_bytes(bytes).to_string()
}
