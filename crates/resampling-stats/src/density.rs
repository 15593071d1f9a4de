//! Empirical distribution and kernel density estimation.
//!
//! ```
//! use resampling_stats::density::{Bandwidth, Ecdf, Kde, Kernel};
//!
//! let sample = [1.0, 2.0, 2.0, 3.0];
//! let ecdf = Ecdf::new(sample.to_vec()).unwrap();
//! assert_eq!(ecdf.evaluate(2.0), 0.75);
//!
//! let kde = Kde::new(&sample, Kernel::Epanechnikov, Bandwidth::Fixed(1.0)).unwrap();
//! assert!(kde.evaluate(2.0) > kde.evaluate(3.0));
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{
    descriptive,
    error::{ResampleError, Result, ensure_non_empty},
    percentiles,
};

/// Empirical cumulative distribution function.
#[derive(Debug, Clone, Serialize)]
pub struct Ecdf {
    sorted: Vec<f64>,
}

impl Ecdf {
    pub fn new(mut values: Vec<f64>) -> Result<Self> {
        ensure_non_empty(&values, "sample")?;
        values.sort_by(f64::total_cmp);
        Ok(Self { sorted: values })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Fraction of observations `<= x`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let below = self.sorted.partition_point(|&v| v <= x);
        below as f64 / self.sorted.len() as f64
    }

    /// `(x_(i), i / n)` for `i = 1..=n`, ascending.
    #[expect(clippy::cast_precision_loss)]
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let n = self.sorted.len() as f64;
        self.sorted
            .iter()
            .enumerate()
            .map(move |(i, &v)| (v, (i + 1) as f64 / n))
    }
}

/// Smoothing kernel, scaled to unit variance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kernel {
    /// `3 / (4√5) · (1 - u² / 5)` on `|u| <= √5`.
    #[default]
    Epanechnikov,
    Gaussian,
}

impl Kernel {
    #[must_use]
    pub fn weight(self, u: f64) -> f64 {
        match self {
            Self::Epanechnikov => {
                let sqrt5 = 5.0_f64.sqrt();
                if u.abs() <= sqrt5 {
                    3.0 / (4.0 * sqrt5) * (1.0 - u * u / 5.0)
                } else {
                    0.0
                }
            }
            Self::Gaussian => (-0.5 * u * u).exp() / (2.0 * PI).sqrt(),
        }
    }
}

/// How the smoothing bandwidth is chosen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bandwidth {
    /// Silverman's rule of thumb, see [`silverman_bandwidth`].
    #[default]
    Silverman,
    Fixed(f64),
}

/// Silverman's rule of thumb `0.9 · min(s, IQR / 1.34) · n^(-1/5)`.
///
/// `s` is the sample standard deviation. When one of the two spread measures
/// is zero the other one is used alone.
#[expect(clippy::cast_precision_loss)]
pub fn silverman_bandwidth(sample: &[f64]) -> Result<f64> {
    ensure_non_empty(sample, "sample")?;
    let sd = descriptive::std_dev(sample, 1)?;
    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    let iqr = percentiles::interquartile_range(&sorted) / 1.34;

    let spread = match (sd > 0.0, iqr > 0.0) {
        (true, true) => sd.min(iqr),
        (true, false) => sd,
        (false, true) => iqr,
        (false, false) => return Err(ResampleError::DegenerateSpread),
    };
    Ok(0.9 * spread * (sample.len() as f64).powf(-0.2))
}

/// Kernel density estimate `f(x) = 1 / (n h) · Σ K((x - xᵢ) / h)`.
#[derive(Debug, Clone)]
pub struct Kde {
    sample: Vec<f64>,
    kernel: Kernel,
    bandwidth: f64,
}

impl Kde {
    pub fn new(sample: &[f64], kernel: Kernel, bandwidth: Bandwidth) -> Result<Self> {
        ensure_non_empty(sample, "sample")?;
        let bandwidth = match bandwidth {
            Bandwidth::Silverman => silverman_bandwidth(sample)?,
            Bandwidth::Fixed(h) => h,
        };
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return Err(ResampleError::InvalidBandwidth { bandwidth });
        }
        Ok(Self {
            sample: sample.to_vec(),
            kernel,
            bandwidth,
        })
    }

    #[must_use]
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let total = self
            .sample
            .iter()
            .map(|&xi| self.kernel.weight((x - xi) / h))
            .sum::<f64>();
        total / (self.sample.len() as f64 * h)
    }

    #[must_use]
    pub fn evaluate_many(&self, points: &[f64]) -> Vec<f64> {
        points.iter().map(|&x| self.evaluate(x)).collect()
    }
}

/// `count` evenly spaced points from `start` to `end` inclusive.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
