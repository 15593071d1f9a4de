//! Two-sample permutation tests.
//!
//! Under the null hypothesis the group labels are exchangeable, so the
//! statistic recomputed on randomly relabelled data forms its null
//! distribution.
//!
//! # Examples
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64;
//! use resampling_stats::permutation::{self, Alternative};
//!
//! let mut rng = Pcg64::seed_from_u64(3);
//! let x = [12.1, 11.4, 13.0, 12.7, 12.2, 13.3];
//! let y = [10.2, 10.9, 9.8, 10.5, 11.0, 10.1];
//! let test = permutation::permutation_test(
//!     &mut rng,
//!     &x,
//!     &y,
//!     permutation::percentile_difference(50.0),
//!     2000,
//!     Alternative::TwoSided,
//! )
//! .unwrap();
//! assert!(test.p_value < 0.05);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ResampleError, Result, ensure_non_empty, ensure_replicates},
    percentiles, sampling,
};

/// Which tail(s) of the null distribution count as extreme.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alternative {
    /// `2 · P(|T| >= |t|)`, clamped to 1.
    #[default]
    TwoSided,
    /// `P(T >= t)`.
    Greater,
    /// `P(T <= t)`.
    Less,
}

/// Outcome of a permutation test.
#[derive(Debug, Clone, Serialize)]
pub struct PermutationTest {
    /// Statistic on the original labelling.
    pub observed: f64,
    /// Statistic under each random relabelling, sorted ascending.
    pub null_distribution: Vec<f64>,
    pub p_value: f64,
    pub alternative: Alternative,
}

/// Statistic `P_p(x) - P_p(y)`, the difference of the `p`-th percentiles.
pub fn percentile_difference(p: f64) -> impl Fn(&[f64], &[f64]) -> f64 {
    move |x, y| percentile_of(x, p) - percentile_of(y, p)
}

fn percentile_of(values: &[f64], p: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentiles::compute_percentile(&sorted, p)
}

/// Permutation test of `statistic(x, y)`.
///
/// The pooled sample `x ++ y` is relabelled `reps` times by a uniform random
/// permutation; the first `x.len()` permuted values play the role of `x`.
///
/// Fails with [`ResampleError::UndefinedStatistic`] when the statistic is
/// `NaN` on the observed groups, e.g. a standard deviation of a single value.
pub fn permutation_test<R, F>(
    rng: &mut R,
    x: &[f64],
    y: &[f64],
    statistic: F,
    reps: usize,
    alternative: Alternative,
) -> Result<PermutationTest>
where
    R: Rng + ?Sized,
    F: Fn(&[f64], &[f64]) -> f64,
{
    ensure_non_empty(x, "x")?;
    ensure_non_empty(y, "y")?;
    ensure_replicates(reps)?;

    let observed = statistic(x, y);
    if observed.is_nan() {
        return Err(ResampleError::UndefinedStatistic {
            what: "permutation test",
        });
    }
    let pooled = [x, y].concat();
    let mut relabelled = vec![0.0; pooled.len()];
    let mut null_distribution = Vec::with_capacity(reps);
    for _ in 0..reps {
        let order = sampling::permuted_indices(rng, pooled.len());
        for (slot, &idx) in relabelled.iter_mut().zip(&order) {
            *slot = pooled[idx];
        }
        let (px, py) = relabelled.split_at(x.len());
        null_distribution.push(statistic(px, py));
    }
    null_distribution.sort_by(f64::total_cmp);

    let p_value = p_value(observed, &null_distribution, alternative);
    Ok(PermutationTest {
        observed,
        null_distribution,
        p_value,
        alternative,
    })
}

#[expect(clippy::cast_precision_loss)]
fn p_value(observed: f64, null_distribution: &[f64], alternative: Alternative) -> f64 {
    let reps = null_distribution.len() as f64;
    let extreme = null_distribution
        .iter()
        .filter(|&&v| match alternative {
            Alternative::TwoSided => v.abs() >= observed.abs(),
            Alternative::Greater => v >= observed,
            Alternative::Less => v <= observed,
        })
        .count() as f64;
    match alternative {
        Alternative::TwoSided => (2.0 * extreme / reps).min(1.0),
        Alternative::Greater | Alternative::Less => extreme / reps,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::{statistic::Statistic, synthetic};

    fn mean_difference(x: &[f64], y: &[f64]) -> f64 {
        Statistic::Mean.difference(x, y)
    }

    #[test]
    fn test_detects_shift() {
        let mut rng = Pcg64::seed_from_u64(21);
        let x = synthetic::normal_sample(&mut rng, 1.5, 1.0, 30).unwrap();
        let y = synthetic::normal_sample(&mut rng, 0.0, 1.0, 30).unwrap();
        let test =
            permutation_test(&mut rng, &x, &y, mean_difference, 2000, Alternative::TwoSided)
                .unwrap();
        assert!(test.p_value < 0.01, "p = {}", test.p_value);
        assert_eq!(test.null_distribution.len(), 2000);
        assert!(test.null_distribution.is_sorted_by(|a, b| a <= b));
    }

    #[test]
    fn test_null_p_value_is_large_and_clamped() {
        let mut rng = Pcg64::seed_from_u64(22);
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [4.0, 3.0, 2.0, 1.0];
        let test =
            permutation_test(&mut rng, &x, &y, mean_difference, 500, Alternative::TwoSided)
                .unwrap();
        // Observed difference is zero so every relabelling is as extreme
        assert_eq!(test.observed, 0.0);
        assert_eq!(test.p_value, 1.0);
    }

    #[test]
    fn test_one_sided_alternatives() {
        let mut rng = Pcg64::seed_from_u64(23);
        let x = [10.0, 11.0, 12.0, 13.0, 14.0];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        let greater =
            permutation_test(&mut rng, &x, &y, mean_difference, 1000, Alternative::Greater)
                .unwrap();
        let less =
            permutation_test(&mut rng, &x, &y, mean_difference, 1000, Alternative::Less).unwrap();
        assert!(greater.p_value < 0.05);
        assert!(less.p_value > 0.9);
    }

    #[test]
    fn test_percentile_difference_statistic() {
        let stat = percentile_difference(50.0);
        assert_eq!(stat(&[1.0, 5.0, 3.0], &[0.0, 1.0, 2.0]), 2.0);
    }

    #[test]
    fn test_rejects_undefined_observed_statistic() {
        let mut rng = Pcg64::seed_from_u64(25);
        let sd_difference = |x: &[f64], y: &[f64]| Statistic::StdDev.difference(x, y);
        let result = permutation_test(
            &mut rng,
            &[1.0],
            &[2.0, 3.0, 4.0],
            sd_difference,
            200,
            Alternative::TwoSided,
        );
        assert_eq!(
            result.unwrap_err(),
            ResampleError::UndefinedStatistic {
                what: "permutation test"
            }
        );
    }

    #[test]
    fn test_rejects_empty_groups() {
        let mut rng = Pcg64::seed_from_u64(24);
        assert!(matches!(
            permutation_test(&mut rng, &[], &[1.0], mean_difference, 10, Alternative::TwoSided),
            Err(ResampleError::EmptySample { .. })
        ));
    }
}
