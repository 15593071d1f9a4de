//! Nonparametric bootstrap.
//!
//! A statistic is recomputed on many replicates drawn with replacement from
//! the observed sample. The sorted replicate values approximate the sampling
//! distribution of the statistic, and plain percentile intervals are read
//! straight off it (no smoothing, no bias correction).
//!
//! # Examples
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64;
//! use resampling_stats::{bootstrap, statistic::Statistic};
//!
//! let mut rng = Pcg64::seed_from_u64(42);
//! let sample = [2.1, 3.4, 1.9, 5.6, 4.4, 3.3, 2.8, 4.0];
//! let dist =
//!     bootstrap::bootstrap(&mut rng, &sample, |s| Statistic::Mean.compute(s), 1000).unwrap();
//! let ci = dist.confidence_interval(2.5, 97.5).unwrap();
//! assert!(ci.lower <= ci.upper);
//! ```

use rand::Rng;
use serde::Serialize;

use crate::{
    descriptive,
    error::{ResampleError, Result, ensure_non_empty, ensure_replicates},
    percentiles, sampling,
};

/// Sorted bootstrap replicates of a statistic.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapDistribution {
    /// Statistic of the original sample.
    pub observed: f64,
    replicates: Vec<f64>,
}

/// A percentile confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    pub lower_percentile: f64,
    pub upper_percentile: f64,
}

impl ConfidenceInterval {
    /// Whether `value` lies inside the closed interval.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }

    /// Upper minus lower bound.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl BootstrapDistribution {
    /// Wraps replicate values, sorting them ascending.
    #[must_use]
    pub fn from_replicates(observed: f64, mut replicates: Vec<f64>) -> Self {
        replicates.sort_by(f64::total_cmp);
        Self {
            observed,
            replicates,
        }
    }

    /// Replicate values in ascending order.
    #[must_use]
    pub fn replicates(&self) -> &[f64] {
        &self.replicates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.replicates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replicates.is_empty()
    }

    /// Mean of the replicates.
    pub fn mean(&self) -> Result<f64> {
        descriptive::mean(&self.replicates)
    }

    /// Bootstrap standard error: standard deviation of the replicates.
    pub fn standard_error(&self) -> Result<f64> {
        descriptive::std_dev(&self.replicates, 1)
    }

    /// Replicate value at `percentile` (0-100).
    pub fn percentile(&self, percentile: f64) -> Result<f64> {
        percentiles::checked_percentile(&self.replicates, percentile)
    }

    /// Percentile interval `[P(lower), P(upper)]`.
    pub fn confidence_interval(&self, lower: f64, upper: f64) -> Result<ConfidenceInterval> {
        if lower > upper {
            return Err(ResampleError::InvalidPercentile { percentile: lower });
        }
        Ok(ConfidenceInterval {
            lower: self.percentile(lower)?,
            upper: self.percentile(upper)?,
            lower_percentile: lower,
            upper_percentile: upper,
        })
    }

    /// Central interval at the given confidence level, e.g. `0.95` for
    /// `[P2.5, P97.5]`.
    pub fn central_interval(&self, confidence: f64) -> Result<ConfidenceInterval> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ResampleError::InvalidPercentile {
                percentile: confidence * 100.0,
            });
        }
        let tail = (100.0 - confidence * 100.0) / 2.0;
        self.confidence_interval(tail, 100.0 - tail)
    }
}

/// Computes `statistic` over `reps` bootstrap replicates of `sample`.
pub fn bootstrap<R, F>(
    rng: &mut R,
    sample: &[f64],
    statistic: F,
    reps: usize,
) -> Result<BootstrapDistribution>
where
    R: Rng + ?Sized,
    F: Fn(&[f64]) -> f64,
{
    ensure_non_empty(sample, "sample")?;
    ensure_replicates(reps)?;

    let observed = statistic(sample);
    let mut buffer = vec![0.0; sample.len()];
    let replicates = (0..reps)
        .map(|_| {
            sampling::resample_into(rng, sample, &mut buffer);
            statistic(&buffer)
        })
        .collect();
    Ok(BootstrapDistribution::from_replicates(observed, replicates))
}

/// Bootstrap percentile interval at `confidence` (e.g. `0.95`).
pub fn bootstrap_ci<R, F>(
    rng: &mut R,
    sample: &[f64],
    statistic: F,
    reps: usize,
    confidence: f64,
) -> Result<ConfidenceInterval>
where
    R: Rng + ?Sized,
    F: Fn(&[f64]) -> f64,
{
    bootstrap(rng, sample, statistic, reps)?.central_interval(confidence)
}

/// Distribution of `statistic(x*) - statistic(y*)` where each group is
/// resampled independently with replacement.
pub fn bootstrap_difference<R, F>(
    rng: &mut R,
    x: &[f64],
    y: &[f64],
    statistic: F,
    reps: usize,
) -> Result<BootstrapDistribution>
where
    R: Rng + ?Sized,
    F: Fn(&[f64]) -> f64,
{
    ensure_non_empty(x, "x")?;
    ensure_non_empty(y, "y")?;
    ensure_replicates(reps)?;

    let observed = statistic(x) - statistic(y);
    let mut x_buf = vec![0.0; x.len()];
    let mut y_buf = vec![0.0; y.len()];
    let replicates = (0..reps)
        .map(|_| {
            sampling::resample_into(rng, x, &mut x_buf);
            sampling::resample_into(rng, y, &mut y_buf);
            statistic(&x_buf) - statistic(&y_buf)
        })
        .collect();
    Ok(BootstrapDistribution::from_replicates(observed, replicates))
}
