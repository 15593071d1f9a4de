use serde::Serialize;

use crate::{
    error::{ResampleError, Result, ensure_non_empty},
    percentiles,
};

/// Descriptive statistics summarizing a dataset.
///
/// This structure contains common measures of central tendency, dispersion,
/// and spread for a dataset of `f64` values.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptiveStats {
    /// The number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The median value of the dataset (linear interpolation for even counts).
    pub median: f64,
    /// The population variance of the dataset (divisor `n`).
    pub variance: f64,
    /// The population standard deviation of the dataset.
    pub std_dev: f64,
    /// The sample standard deviation (divisor `n - 1`), `NaN` for a single value.
    pub sample_std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// This method will sort the values internally before computing statistics.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use resampling_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// Use this when you already have sorted data to avoid unnecessary work.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let median = percentiles::compute_percentile(sorted_values, 50.0);
        let sum_sq = sum_of_squared_deviations(sorted_values, mean);
        let variance = sum_sq / n;
        let sample_std_dev = if count > 1 {
            (sum_sq / (n - 1.0)).sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev: variance.sqrt(),
            sample_std_dev,
        })
    }
}

/// Arithmetic mean.
///
/// ```
/// # use resampling_stats::descriptive::mean;
/// assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0]).unwrap(), 3.0);
/// assert!(mean(&[]).is_err());
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Result<f64> {
    ensure_non_empty(values, "sample")?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Variance with `ddof` delta degrees of freedom (divisor `n - ddof`).
///
/// `ddof = 0` gives the population variance, `ddof = 1` the unbiased sample
/// variance. Fails when `n <= ddof`.
///
/// ```
/// # use resampling_stats::descriptive::variance;
/// let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert_eq!(variance(&values, 0).unwrap(), 4.0);
/// assert!(variance(&[1.0], 1).is_err());
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn variance(values: &[f64], ddof: usize) -> Result<f64> {
    if values.len() <= ddof {
        return Err(ResampleError::InsufficientData {
            what: "variance",
            needed: ddof + 1,
            got: values.len(),
        });
    }
    let mean = mean(values)?;
    Ok(sum_of_squared_deviations(values, mean) / (values.len() - ddof) as f64)
}

/// Standard deviation with `ddof` delta degrees of freedom.
pub fn std_dev(values: &[f64], ddof: usize) -> Result<f64> {
    variance(values, ddof).map(f64::sqrt)
}

/// Median of unsorted values.
pub fn median(values: &[f64]) -> Result<f64> {
    ensure_non_empty(values, "sample")?;
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(percentiles::compute_percentile(&sorted, 50.0))
}

pub(crate) fn sum_of_squared_deviations(values: &[f64], center: f64) -> f64 {
    values.iter().map(|v| (v - center).powi(2)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset() {
        assert!(DescriptiveStats::new(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::new([4.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 4.0);
        assert_eq!(stats.variance, 0.0);
        assert!(stats.sample_std_dev.is_nan());
    }

    #[test]
    fn test_even_count_median_interpolates() {
        let stats = DescriptiveStats::new([4.0, 1.0, 3.0, 2.0]).unwrap();
        assert!((stats.median - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_sample_and_population_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = DescriptiveStats::new(values).unwrap();
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
        assert!((stats.sample_std_dev - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!((std_dev(&values, 1).unwrap() - stats.sample_std_dev).abs() < 1e-12);
    }

    #[test]
    fn test_variance_rejects_zero_degrees_of_freedom() {
        assert_eq!(
            variance(&[1.0, 2.0], 2),
            Err(ResampleError::InsufficientData {
                what: "variance",
                needed: 3,
                got: 2
            })
        );
    }

    #[test]
    fn test_median_of_unsorted() {
        assert_eq!(median(&[9.0, 1.0, 5.0]).unwrap(), 5.0);
        assert!(median(&[]).is_err());
    }
}
