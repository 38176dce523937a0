//! Batch Transfer Progress
//!
//! Per-file transfers report bytes as they are handed to the wire; the
//! aggregate is one overall fraction across the whole batch:
//! summed-bytes-loaded over summed-bytes-total.

use std::sync::atomic::{AtomicU64, Ordering};

/// Shared progress counters for one upload batch.
#[derive(Debug, Default)]
pub struct BatchProgress {
    loaded: AtomicU64,
    total: AtomicU64,
}

impl BatchProgress {
    /// Create counters with nothing loaded yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the batch total (sum of all file sizes), once, before
    /// transfers start.
    pub fn set_total(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
    }

    /// Record bytes handed to the wire.
    pub fn add_loaded(&self, bytes: u64) {
        self.loaded.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Bytes loaded so far, across all files.
    #[must_use]
    pub fn loaded(&self) -> u64 {
        self.loaded.load(Ordering::Relaxed)
    }

    /// Batch total in bytes.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Overall completion in [0.0, 1.0]. Zero-byte batches count as done.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 1.0;
        }
        (self.loaded() as f64 / total as f64).min(1.0)
    }

    /// Overall completion as whole percent.
    #[must_use]
    pub fn percent(&self) -> u8 {
        (self.fraction() * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregates_across_files() {
        let progress = BatchProgress::new();
        progress.set_total(200);

        // Two transfers feeding the same counters
        progress.add_loaded(50);
        progress.add_loaded(100);

        assert_eq!(progress.loaded(), 150);
        assert_eq!(progress.percent(), 75);
    }

    #[test]
    fn test_empty_batch_is_complete() {
        let progress = BatchProgress::new();
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn test_fraction_capped_at_one() {
        let progress = BatchProgress::new();
        progress.set_total(10);
        progress.add_loaded(20);
        assert!((progress.fraction() - 1.0).abs() < f64::EPSILON);
    }
}
