//! Named statistics that can be selected at runtime.
//!
//! The resampling routines accept any `Fn(&[f64]) -> f64`; [`Statistic`]
//! names the common choices so they can be parsed from a command line or a
//! configuration value.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{descriptive, percentiles};

/// A scalar summary of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    /// Arithmetic mean.
    #[display("mean")]
    Mean,
    /// Median (50th percentile, interpolated).
    #[display("median")]
    Median,
    /// Sample standard deviation (divisor `n - 1`).
    #[display("std")]
    StdDev,
    /// Sample variance (divisor `n - 1`).
    #[display("var")]
    Variance,
    /// Percentile in `0..=100`.
    #[display("p{_0}")]
    Percentile(f64),
}

impl Statistic {
    /// Evaluates the statistic on `values`.
    ///
    /// Returns `NaN` when the statistic is undefined for the input (empty
    /// input, or a single value for the dispersion statistics).
    ///
    /// ```
    /// use resampling_stats::statistic::Statistic;
    ///
    /// let values = [1.0, 2.0, 3.0, 4.0];
    /// assert_eq!(Statistic::Mean.compute(&values), 2.5);
    /// assert_eq!(Statistic::Percentile(100.0).compute(&values), 4.0);
    /// ```
    #[must_use]
    pub fn compute(&self, values: &[f64]) -> f64 {
        match self {
            Self::Mean => descriptive::mean(values).unwrap_or(f64::NAN),
            Self::Median => descriptive::median(values).unwrap_or(f64::NAN),
            Self::StdDev => descriptive::std_dev(values, 1).unwrap_or(f64::NAN),
            Self::Variance => descriptive::variance(values, 1).unwrap_or(f64::NAN),
            Self::Percentile(p) => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                percentiles::compute_percentile(&sorted, *p)
            }
        }
    }

    /// Difference of this statistic between two groups, `stat(x) - stat(y)`.
    #[must_use]
    pub fn difference(&self, x: &[f64], y: &[f64]) -> f64 {
        self.compute(x) - self.compute(y)
    }
}

/// Error returned when a statistic name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown statistic '{name}' (expected mean, median, std, var or p<0-100>)")]
pub struct ParseStatisticError {
    name: String,
}

impl FromStr for Statistic {
    type Err = ParseStatisticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseStatisticError { name: s.to_owned() };
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "std" | "sd" | "std_dev" => Ok(Self::StdDev),
            "var" | "variance" => Ok(Self::Variance),
            other => {
                let p = other
                    .strip_prefix('p')
                    .and_then(|rest| rest.parse::<f64>().ok())
                    .ok_or_else(err)?;
                if (0.0..=100.0).contains(&p) {
                    Ok(Self::Percentile(p))
                } else {
                    Err(err())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("mean".parse::<Statistic>().unwrap(), Statistic::Mean);
        assert_eq!("STD".parse::<Statistic>().unwrap(), Statistic::StdDev);
        assert_eq!(
            "p97.5".parse::<Statistic>().unwrap(),
            Statistic::Percentile(97.5)
        );
        assert!("p101".parse::<Statistic>().is_err());
        assert!("mode".parse::<Statistic>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for stat in [
            Statistic::Mean,
            Statistic::Median,
            Statistic::StdDev,
            Statistic::Variance,
            Statistic::Percentile(2.5),
        ] {
            assert_eq!(stat.to_string().parse::<Statistic>().unwrap(), stat);
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Statistic::StdDev.to_string(), "std");
        assert_eq!(Statistic::Percentile(97.5).to_string(), "p97.5");
    }

    #[test]
    fn test_undefined_is_nan() {
        assert!(Statistic::StdDev.compute(&[1.0]).is_nan());
        assert!(Statistic::Mean.compute(&[]).is_nan());
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&Statistic::StdDev).unwrap(), r#""std_dev""#);
        assert_eq!(
            serde_json::to_string(&Statistic::Percentile(97.5)).unwrap(),
            r#"{"percentile":97.5}"#
        );
    }

    #[test]
    fn test_difference() {
        let x = [1.0, 2.0, 3.0];
        let y = [0.0, 0.0, 0.0];
        assert_eq!(Statistic::Mean.difference(&x, &y), 2.0);
    }
}
