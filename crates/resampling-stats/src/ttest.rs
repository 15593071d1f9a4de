//! Independent two-sample t-tests.
//!
//! Used both as a stand-alone test and as the per-feature statistic inside
//! permutation procedures, where only [`t_statistic`] is evaluated.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF as _, StudentsT};

use crate::{
    descriptive,
    error::{ResampleError, Result},
};

/// How the two group variances are combined.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceAssumption {
    /// Equal variances, pooled estimate (Student's t-test).
    #[default]
    Pooled,
    /// Unequal variances with Welch-Satterthwaite degrees of freedom.
    Welch,
}

/// Result of a two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTest {
    pub statistic: f64,
    pub df: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

struct GroupMoments {
    n: f64,
    mean: f64,
    var: f64,
}

#[expect(clippy::cast_precision_loss)]
fn moments(values: &[f64], what: &'static str) -> Result<GroupMoments> {
    if values.len() < 2 {
        return Err(ResampleError::InsufficientData {
            what,
            needed: 2,
            got: values.len(),
        });
    }
    Ok(GroupMoments {
        n: values.len() as f64,
        mean: descriptive::mean(values)?,
        var: descriptive::variance(values, 1)?,
    })
}

fn statistic_and_df(
    x: &GroupMoments,
    y: &GroupMoments,
    assumption: VarianceAssumption,
) -> (f64, f64) {
    let diff = x.mean - y.mean;
    match assumption {
        VarianceAssumption::Pooled => {
            let df = x.n + y.n - 2.0;
            let pooled = ((x.n - 1.0) * x.var + (y.n - 1.0) * y.var) / df;
            let se = (pooled * (1.0 / x.n + 1.0 / y.n)).sqrt();
            (diff / se, df)
        }
        VarianceAssumption::Welch => {
            let vx = x.var / x.n;
            let vy = y.var / y.n;
            let se = (vx + vy).sqrt();
            let df = (vx + vy).powi(2) / (vx.powi(2) / (x.n - 1.0) + vy.powi(2) / (y.n - 1.0));
            (diff / se, df)
        }
    }
}

/// Two-sample t statistic `(mean(x) - mean(y)) / se`.
///
/// Returns `NaN` when either group has fewer than two values; a zero standard
/// error yields an infinite (or `NaN`) statistic.
#[must_use]
pub fn t_statistic(x: &[f64], y: &[f64], assumption: VarianceAssumption) -> f64 {
    match (moments(x, "x"), moments(y, "y")) {
        (Ok(mx), Ok(my)) => statistic_and_df(&mx, &my, assumption).0,
        _ => f64::NAN,
    }
}

/// Independent two-sample t-test with a two-sided p-value.
///
/// ```
/// use resampling_stats::ttest::{VarianceAssumption, t_test_ind};
///
/// let x = [5.1, 4.9, 5.6, 5.8, 6.0, 5.4];
/// let y = [4.1, 3.9, 4.4, 4.0, 4.6, 4.2];
/// let test = t_test_ind(&x, &y, VarianceAssumption::Pooled).unwrap();
/// assert!(test.statistic > 0.0);
/// assert!(test.p_value < 0.01);
/// ```
pub fn t_test_ind(x: &[f64], y: &[f64], assumption: VarianceAssumption) -> Result<TTest> {
    let mx = moments(x, "x")?;
    let my = moments(y, "y")?;
    let (statistic, df) = statistic_and_df(&mx, &my, assumption);
    let p_value = two_sided_p_value(statistic, df);
    Ok(TTest {
        statistic,
        df,
        p_value,
    })
}

fn two_sided_p_value(statistic: f64, df: f64) -> f64 {
    if statistic.is_nan() || !df.is_finite() || df <= 0.0 {
        return f64::NAN;
    }
    if statistic.is_infinite() {
        return 0.0;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(statistic.abs())).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pooled_matches_reference() {
        // Reference values from a standard two-sample t-test implementation
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        let test = t_test_ind(&x, &y, VarianceAssumption::Pooled).unwrap();
        assert!((test.statistic - (-1.897_366_596)).abs() < 1e-6);
        assert_eq!(test.df, 8.0);
        assert!((test.p_value - 0.094_3).abs() < 1e-3, "p = {}", test.p_value);
    }

    #[test]
    fn test_welch_degrees_of_freedom() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        let test = t_test_ind(&x, &y, VarianceAssumption::Welch).unwrap();
        // vx = 0.5, vy = 2.0; df = 6.25 / (0.0625 + 1.0)
        assert!((test.df - 5.882_352_941).abs() < 1e-6);
        assert!((test.statistic - (-1.897_366_596)).abs() < 1e-6);
    }

    #[test]
    fn test_identical_groups_are_not_significant() {
        let x = [1.0, 2.0, 3.0];
        let test = t_test_ind(&x, &x, VarianceAssumption::Pooled).unwrap();
        assert_eq!(test.statistic, 0.0);
        assert!((test.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_too_small_groups() {
        assert!(t_test_ind(&[1.0], &[1.0, 2.0], VarianceAssumption::Pooled).is_err());
        assert!(t_statistic(&[1.0], &[1.0, 2.0], VarianceAssumption::Welch).is_nan());
    }
}
