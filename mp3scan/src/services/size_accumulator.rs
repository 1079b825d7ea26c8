//! Running byte total for the process pass

use mp3scan_common::human_size::HumanSize;

/// Sum of the sizes of all processed files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeAccumulator {
    total: u64,
}

impl SizeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, size: u64) {
        self.total = self.total.saturating_add(size);
    }

    pub fn total_bytes(&self) -> u64 {
        self.total
    }

    /// Total scaled to the largest unit not exceeding 1024 (up to TB)
    pub fn report(&self) -> HumanSize {
        HumanSize::from_bytes(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_and_reports_megabytes() {
        let mut sizes = SizeAccumulator::new();
        for size in [500, 1500, 1_048_000] {
            sizes.add(size);
        }

        assert_eq!(sizes.total_bytes(), 1_050_000);
        assert_eq!(sizes.report().unit(), "MB");
        assert_eq!(sizes.report().to_string(), "1.0 MB");
    }

    #[test]
    fn test_empty_total() {
        assert_eq!(SizeAccumulator::new().report().to_string(), "0.0 B");
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        let mut sizes = SizeAccumulator::new();
        sizes.add(u64::MAX);
        sizes.add(1);
        assert_eq!(sizes.total_bytes(), u64::MAX);
        assert_eq!(sizes.report().unit(), "TB");
    }
}
