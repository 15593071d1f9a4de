//! Resampling-based statistical inference.
//!
//! This crate provides computer-intensive alternatives to closed-form
//! inference, including:
//!
//! - **Sampling**: with and without replacement, weighted, and permutations
//! - **Bootstrap**: replicate distributions and percentile confidence intervals
//! - **Permutation tests**: two-sample tests with exchangeable labels
//! - **Multiple testing**: Bonferroni, Benjamini-Hochberg and Westfall-Young step-down
//! - **Jackknife**: leave-one-out bias and variance of a statistic
//! - **Cross-validation**: leave-one-out selection of polynomial degree
//! - **Density estimation**: empirical CDF and kernel density estimates
//!
//! Every random routine takes the generator explicitly, so a seeded
//! generator makes the whole computation reproducible.
//!
//! # Modules
//!
//! - [`sampling`]: Drawing samples and permutations from a population
//! - [`bootstrap`]: Bootstrap distributions and confidence intervals
//! - [`permutation`]: Two-sample permutation tests
//! - [`ttest`]: Two-sample t statistics and tests
//! - [`multiple_testing`]: Family-wise and false-discovery-rate corrections
//! - [`jackknife`]: Jackknife estimates
//! - [`cross_validation`]: Leave-one-out cross-validation and polynomial fits
//! - [`density`]: ECDF and kernel density estimation
//! - [`descriptive`], [`percentiles`], [`histogram`]: Summaries of a sample
//! - [`statistic`]: Named statistics usable as resampling targets
//! - [`synthetic`]: Seeded synthetic datasets
//!
//! # Examples
//!
//! ## Bootstrap confidence interval of the median
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64;
//! use resampling_stats::{bootstrap, statistic::Statistic};
//!
//! let mut rng = Pcg64::seed_from_u64(42);
//! let sample = [2.1, 3.4, 1.9, 5.6, 4.2, 3.3, 2.8, 4.9, 3.7, 2.5];
//! let median = |s: &[f64]| Statistic::Median.compute(s);
//! let ci = bootstrap::bootstrap_ci(&mut rng, &sample, median, 1000, 0.95).unwrap();
//! assert!(ci.lower <= ci.upper);
//! ```
//!
//! ## Sampling without replacement
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64;
//! use resampling_stats::{ResampleError, sampling};
//!
//! let mut rng = Pcg64::seed_from_u64(1);
//! let population = [1, 2, 3, 4];
//! let draw = sampling::sample_without_replacement(&mut rng, &population, 12);
//! assert_eq!(
//!     draw.unwrap_err(),
//!     ResampleError::SampleTooLarge { requested: 12, population: 4 }
//! );
//! ```

pub use self::error::{ResampleError, Result};

pub mod bootstrap;
pub mod cross_validation;
pub mod density;
pub mod descriptive;
pub mod error;
pub mod histogram;
pub mod jackknife;
pub mod multiple_testing;
pub mod percentiles;
pub mod permutation;
pub mod sampling;
pub mod statistic;
pub mod synthetic;
pub mod ttest;
