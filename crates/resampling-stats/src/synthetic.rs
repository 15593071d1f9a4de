//! Seeded synthetic datasets.
//!
//! These reproduce the kinds of data used to demonstrate the resampling
//! methods: normal samples, a two-cluster mixture for density estimation,
//! noisy polynomial data for model-order selection, and a feature matrix with
//! a handful of truly shifted features for multiple-testing correction.

use rand::Rng;
use rand_distr::{Distribution as _, Normal, Uniform};

use crate::error::{ResampleError, Result};

/// `rand_distr::Normal` accepts a negative `std_dev` (it mirrors the draws),
/// so the sign is checked here.
fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    let invalid = || ResampleError::InvalidParameter {
        name: "standard deviation",
        value: std_dev,
    };
    if !(std_dev.is_finite() && std_dev >= 0.0) {
        return Err(invalid());
    }
    Normal::new(mean, std_dev).map_err(|_| invalid())
}

/// `n` independent draws from N(`mean`, `std_dev`²).
pub fn normal_sample<R>(rng: &mut R, mean: f64, std_dev: f64, n: usize) -> Result<Vec<f64>>
where
    R: Rng + ?Sized,
{
    let dist = normal(mean, std_dev)?;
    Ok((0..n).map(|_| dist.sample(rng)).collect())
}

/// An equal-weight mixture of two normal clusters with common spread.
///
/// The first half of the output comes from the `left` cluster and the second
/// half from the `right` cluster.
pub fn bimodal_sample<R>(
    rng: &mut R,
    left: f64,
    right: f64,
    std_dev: f64,
    n: usize,
) -> Result<Vec<f64>>
where
    R: Rng + ?Sized,
{
    let half = n / 2;
    let mut values = normal_sample(rng, left, std_dev, half)?;
    values.extend(normal_sample(rng, right, std_dev, n - half)?);
    Ok(values)
}

/// Points `(x, y)` with `x` uniform on `[x_min, x_max)` and
/// `y = Σ coefficients[i] · xⁱ + ε`, `ε ~ N(0, noise²)`.
pub fn polynomial_data<R>(
    rng: &mut R,
    coefficients: &[f64],
    x_min: f64,
    x_max: f64,
    noise: f64,
    n: usize,
) -> Result<(Vec<f64>, Vec<f64>)>
where
    R: Rng + ?Sized,
{
    let xs = Uniform::new(x_min, x_max).map_err(|_| ResampleError::InvalidParameter {
        name: "x interval width",
        value: x_max - x_min,
    })?;
    let eps = normal(0.0, noise)?;
    let mut x = (0..n).map(|_| xs.sample(rng)).collect::<Vec<_>>();
    x.sort_by(f64::total_cmp);
    let y = x
        .iter()
        .map(|&xi| {
            let mut acc = 0.0;
            for &c in coefficients.iter().rev() {
                acc = acc * xi + c;
            }
            acc + eps.sample(rng)
        })
        .collect();
    Ok((x, y))
}

/// A `num_features` × (`group_a_size` + `group_b_size`) matrix of N(0, 1)
/// values where the first `shifted` features have their group-B columns
/// shifted by `effect`.
///
/// Rows are features, columns are samples; the first `group_a_size` columns
/// form group A.
pub fn expression_matrix<R>(
    rng: &mut R,
    num_features: usize,
    group_a_size: usize,
    group_b_size: usize,
    shifted: usize,
    effect: f64,
) -> Result<Vec<Vec<f64>>>
where
    R: Rng + ?Sized,
{
    let noise = normal(0.0, 1.0)?;
    Ok((0..num_features)
        .map(|feature| {
            let shift = if feature < shifted { effect } else { 0.0 };
            (0..group_a_size + group_b_size)
                .map(|col| {
                    let value = noise.sample(rng);
                    if col >= group_a_size {
                        value + shift
                    } else {
                        value
                    }
                })
                .collect()
        })
        .collect())
}
