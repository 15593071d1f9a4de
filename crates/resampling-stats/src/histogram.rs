use std::ops::Range;

use serde::Serialize;

use crate::percentiles;

/// A histogram of a replicate distribution.
///
/// The main bins cover P5-P95 so that a few extreme replicates do not squash
/// the shape of the distribution; values outside that range land in dedicated
/// underflow/overflow bins.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    /// The bins comprising the histogram, including underflow and overflow
    /// bins at the ends when the data extends past the main range.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl Histogram {
    /// Creates a histogram from unsorted values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use resampling_stats::histogram::Histogram;
    /// let values = [5.0, 2.0, 8.0, 1.0, 9.0, 3.0, 7.0, 4.0, 6.0, 10.0];
    /// let histogram = Histogram::new(values, 5);
    /// let total: u64 = histogram.bins.iter().map(|b| b.count).sum();
    /// assert_eq!(total, 10);
    /// ```
    #[must_use]
    pub fn new<I>(values: I, num_bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, num_bins)
    }

    /// Creates a histogram from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], num_bins: usize) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let (Some(&hard_min), Some(&hard_max)) = (sorted_values.first(), sorted_values.last())
        else {
            return Self { bins: vec![] };
        };
        if num_bins == 0 {
            return Self { bins: vec![] };
        }

        let soft_min = percentiles::compute_percentile(sorted_values, 5.0);
        let soft_max = percentiles::compute_percentile(sorted_values, 95.0);
        let mut range = soft_max - soft_min;
        if range < f64::EPSILON {
            // Concentrated at a single value
            range = 1.0;
        }
        let bin_width = range / num_bins as f64;
        let first_bin_start = soft_min;
        let last_bin_end = first_bin_start + bin_width * num_bins as f64;

        let has_underflow = hard_min < first_bin_start;
        let has_overflow = hard_max >= last_bin_end;

        let mut bins = Vec::with_capacity(num_bins + 2);
        if has_underflow {
            bins.push(HistogramBin {
                range: hard_min..first_bin_start,
                count: 0,
            });
        }
        for bin_idx in 0..num_bins {
            // Recompute boundaries from the index to avoid accumulated error
            let bin_start = first_bin_start + (bin_idx as f64) * bin_width;
            let bin_end = if bin_idx == num_bins - 1 {
                last_bin_end
            } else {
                first_bin_start + ((bin_idx + 1) as f64) * bin_width
            };
            bins.push(HistogramBin {
                range: bin_start..bin_end,
                count: 0,
            });
        }
        if has_overflow {
            bins.push(HistogramBin {
                range: last_bin_end..hard_max.next_up(),
                count: 0,
            });
        }

        for &val in sorted_values {
            let normalized_position = (val - first_bin_start) / bin_width;
            let idx = if normalized_position < 0.0 && has_underflow {
                0
            } else if normalized_position >= num_bins as f64 && has_overflow {
                num_bins + usize::from(has_underflow)
            } else {
                // Rounding at the edges falls back into the nearest main bin
                (normalized_position.max(0.0).floor() as usize).min(num_bins - 1)
                    + usize::from(has_underflow)
            };
            bins[idx].count += 1;
        }

        Self { bins }
    }

    /// Total number of values counted.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(Histogram::new(Vec::<f64>::new(), 5).bins.is_empty());
        assert!(Histogram::new([1.0, 2.0], 0).bins.is_empty());
    }

    #[test]
    fn test_every_value_is_counted() {
        let values: Vec<f64> = (0..1000).map(|i| f64::from(i) * 0.37).collect();
        let histogram = Histogram::new(values, 10);
        assert_eq!(histogram.total(), 1000);
        // P5-P95 leaves both tails outside the main bins
        assert_eq!(histogram.bins.len(), 12);
    }

    #[test]
    fn test_constant_values() {
        let histogram = Histogram::new([2.0; 20], 4);
        assert_eq!(histogram.total(), 20);
        assert_eq!(histogram.bins[0].count, 20);
    }

    #[test]
    fn test_bins_are_contiguous() {
        let histogram = Histogram::new((0..50).map(f64::from), 5);
        for pair in histogram.bins.windows(2) {
            assert!((pair[0].range.end - pair[1].range.start).abs() < 1e-9);
        }
    }
}
