//! Jackknife (leave-one-out) estimation of bias and variance.
//!
//! ```
//! use resampling_stats::{jackknife, statistic::Statistic};
//!
//! let sample = [3.0, 5.0, 7.0, 9.0];
//! let estimate = jackknife::jackknife(&sample, |s| Statistic::Mean.compute(s)).unwrap();
//! // The sample mean is unbiased, so the jackknife finds no bias
//! assert!(estimate.bias.abs() < 1e-12);
//! ```

use serde::Serialize;

use crate::error::{ResampleError, Result};

/// Leave-one-out view over a sample.
///
/// A boolean mask selects every index except the held-out one. Subsets are
/// written into a single scratch buffer that is reused for every index, so a
/// full jackknife pass allocates once.
#[derive(Debug)]
pub struct LeaveOneOut<'a> {
    sample: &'a [f64],
    mask: Vec<bool>,
    scratch: Vec<f64>,
}

impl<'a> LeaveOneOut<'a> {
    #[must_use]
    pub fn new(sample: &'a [f64]) -> Self {
        Self {
            sample,
            mask: vec![true; sample.len()],
            scratch: Vec::with_capacity(sample.len().saturating_sub(1)),
        }
    }

    /// All observations except `held_out`, in their original order.
    ///
    /// # Panics
    ///
    /// Panics if `held_out` is out of bounds.
    pub fn without(&mut self, held_out: usize) -> &[f64] {
        self.mask[held_out] = false;
        self.scratch.clear();
        self.scratch.extend(
            self.sample
                .iter()
                .zip(&self.mask)
                .filter_map(|(&v, &keep)| keep.then_some(v)),
        );
        self.mask[held_out] = true;
        &self.scratch
    }
}

/// Jackknife summary of a statistic.
#[derive(Debug, Clone, Serialize)]
pub struct JackknifeEstimate {
    /// Statistic on the full sample, θ̂.
    pub full_sample: f64,
    /// Mean of the leave-one-out statistics, θ̄ (the jackknife point estimate).
    pub mean: f64,
    /// `((n - 1) / n) · Σ (θᵢ - θ̄)²`.
    pub variance: f64,
    pub std_error: f64,
    /// `(n - 1) · (θ̄ - θ̂)`.
    pub bias: f64,
    /// `n · θ̂ - (n - 1) · θ̄`.
    pub bias_corrected: f64,
    /// θᵢ for each held-out index `i`.
    pub leave_one_out: Vec<f64>,
}

/// Jackknife estimate of `statistic` over `sample`.
///
/// Requires at least two observations.
#[expect(clippy::cast_precision_loss)]
pub fn jackknife<F>(sample: &[f64], statistic: F) -> Result<JackknifeEstimate>
where
    F: Fn(&[f64]) -> f64,
{
    if sample.len() < 2 {
        return Err(ResampleError::InsufficientData {
            what: "jackknife",
            needed: 2,
            got: sample.len(),
        });
    }

    let n = sample.len() as f64;
    let full_sample = statistic(sample);
    let mut loo = LeaveOneOut::new(sample);
    let leave_one_out = (0..sample.len())
        .map(|i| statistic(loo.without(i)))
        .collect::<Vec<_>>();

    let mean = leave_one_out.iter().sum::<f64>() / n;
    let variance = (n - 1.0) / n * leave_one_out.iter().map(|t| (t - mean).powi(2)).sum::<f64>();

    Ok(JackknifeEstimate {
        full_sample,
        mean,
        variance,
        std_error: variance.sqrt(),
        bias: (n - 1.0) * (mean - full_sample),
        bias_corrected: n * full_sample - (n - 1.0) * mean,
        leave_one_out,
    })
}
