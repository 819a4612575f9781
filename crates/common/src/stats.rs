/// Running minimum over per-run cycle samples.
///
/// Starts at `u64::MAX` so an empty series reports the sentinel rather than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinTracker {
    min: u64,
}

impl Default for MinTracker {
    fn default() -> Self {
        Self { min: u64::MAX }
    }
}

impl MinTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sample: u64) {
        self.min = self.min.min(sample);
    }

    pub fn min(&self) -> u64 {
        self.min
    }
}

impl FromIterator<u64> for MinTracker {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut tracker = MinTracker::new();
        for sample in iter {
            tracker.record(sample);
        }
        tracker
    }
}

/// Ratio of page-aligned to page-unaligned cost. Order-sensitive.
///
/// A zero `unaligned` follows IEEE division (`inf`, or `NaN` when both are zero).
pub fn ratio(aligned: u64, unaligned: u64) -> f64 {
    aligned as f64 / unaligned as f64
}
