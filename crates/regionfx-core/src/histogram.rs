//! Integer histograms and order statistics
//!
//! Adaptive thresholds are read from fixed-bin histograms by rank, and
//! channel medians come from quickselect over small sample windows.

/// Histogram over the integer range `0..bins`
#[derive(Debug, Clone)]
pub struct Histogram {
    counts: Vec<u32>,
    total: u64,
}

impl Histogram {
    /// Create an empty histogram with `bins` bins
    pub fn new(bins: usize) -> Self {
        Self {
            counts: vec![0; bins.max(1)],
            total: 0,
        }
    }

    /// Add one sample; values past the last bin land in the last bin
    #[inline]
    pub fn add(&mut self, value: usize) {
        let bin = value.min(self.counts.len() - 1);
        self.counts[bin] += 1;
        self.total += 1;
    }

    /// Number of samples
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Count in one bin
    pub fn count(&self, bin: usize) -> u32 {
        self.counts.get(bin).copied().unwrap_or(0)
    }

    /// Smallest value whose cumulative count reaches `fract` of the total
    ///
    /// `fract` is clamped to [0, 1]. An empty histogram yields 0.
    pub fn percentile(&self, fract: f64) -> usize {
        if self.total == 0 {
            return 0;
        }
        let target = ((self.total as f64 * fract.clamp(0.0, 1.0)).ceil() as u64).max(1);
        let mut acc = 0u64;
        for (value, &n) in self.counts.iter().enumerate() {
            acc += n as u64;
            if acc >= target {
                return value;
            }
        }
        self.counts.len() - 1
    }
}

/// Median of a sample window by quickselect (upper median for even lengths)
///
/// Reorders `values`. Returns `None` for an empty slice.
pub fn select_median(values: &mut [u8]) -> Option<u8> {
    if values.is_empty() {
        return None;
    }
    let mid = values.len() / 2;
    let (_, median, _) = values.select_nth_unstable(mid);
    Some(*median)
}
