//! Random draws from an in-memory population.
//!
//! Every function takes the random generator explicitly; seeding it is the
//! caller's responsibility. Two operations reorder data and are kept under
//! distinct names because they differ in ownership:
//!
//! - [`shuffle_in_place`] mutates the slice it is given.
//! - [`permutation`] leaves its input untouched and returns a new ordering.
//!
//! # Examples
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64;
//! use resampling_stats::sampling;
//!
//! let mut rng = Pcg64::seed_from_u64(7);
//! let population = [1, 2, 3, 4];
//!
//! let draws = sampling::sample_with_replacement(&mut rng, &population, 12).unwrap();
//! assert_eq!(draws.len(), 12);
//!
//! // Twelve distinct items cannot come out of a population of four
//! assert!(sampling::sample_without_replacement(&mut rng, &population, 12).is_err());
//! ```

use rand::{
    Rng,
    distr::{Distribution as _, weighted::WeightedIndex},
    seq::{SliceRandom as _, index},
};

use crate::error::{ResampleError, Result, ensure_non_empty, ensure_replicates, ensure_same_len};

/// Draws `size` items uniformly with replacement.
pub fn sample_with_replacement<T, R>(rng: &mut R, population: &[T], size: usize) -> Result<Vec<T>>
where
    T: Clone,
    R: Rng + ?Sized,
{
    ensure_non_empty(population, "population")?;
    Ok((0..size)
        .map(|_| population[rng.random_range(0..population.len())].clone())
        .collect())
}

/// Draws `size` items with replacement, item `i` chosen with probability
/// proportional to `weights[i]`.
pub fn sample_weighted<T, R>(
    rng: &mut R,
    population: &[T],
    weights: &[f64],
    size: usize,
) -> Result<Vec<T>>
where
    T: Clone,
    R: Rng + ?Sized,
{
    ensure_non_empty(population, "population")?;
    ensure_same_len(population, weights, "population and weights")?;
    let dist = WeightedIndex::new(weights).map_err(|e| ResampleError::InvalidWeights {
        reason: e.to_string(),
    })?;
    Ok((0..size)
        .map(|_| population[dist.sample(rng)].clone())
        .collect())
}

/// Draws `size` distinct positions of `population` uniformly.
///
/// Fails with [`ResampleError::SampleTooLarge`] when `size` exceeds the
/// population size.
pub fn sample_without_replacement<T, R>(
    rng: &mut R,
    population: &[T],
    size: usize,
) -> Result<Vec<T>>
where
    T: Clone,
    R: Rng + ?Sized,
{
    ensure_fits(population.len(), size)?;
    Ok(index::sample(rng, population.len(), size)
        .into_iter()
        .map(|i| population[i].clone())
        .collect())
}

/// Draws `size` distinct positions, each successive draw weighted by
/// `weights` among the positions not yet taken.
pub fn sample_weighted_without_replacement<T, R>(
    rng: &mut R,
    population: &[T],
    weights: &[f64],
    size: usize,
) -> Result<Vec<T>>
where
    T: Clone,
    R: Rng + ?Sized,
{
    ensure_same_len(population, weights, "population and weights")?;
    ensure_fits(population.len(), size)?;
    if let Some(&bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(ResampleError::InvalidWeights {
            reason: format!("weight {bad} is negative or not finite"),
        });
    }
    let positive = weights.iter().filter(|w| **w > 0.0).count();
    if positive < size {
        return Err(ResampleError::InvalidWeights {
            reason: format!("only {positive} positive weights for a sample of size {size}"),
        });
    }
    let indices = index::sample_weighted(rng, population.len(), |i| weights[i], size).map_err(
        |e| ResampleError::InvalidWeights {
            reason: e.to_string(),
        },
    )?;
    Ok(indices.into_iter().map(|i| population[i].clone()).collect())
}

/// Shuffles `values` in place.
pub fn shuffle_in_place<T, R>(rng: &mut R, values: &mut [T])
where
    R: Rng + ?Sized,
{
    values.shuffle(rng);
}

/// Returns a uniformly permuted copy of `values`; the input keeps its order.
pub fn permutation<T, R>(rng: &mut R, values: &[T]) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut permuted = values.to_vec();
    permuted.shuffle(rng);
    permuted
}

/// Returns a uniform random permutation of `0..n`.
pub fn permuted_indices<R>(rng: &mut R, n: usize) -> Vec<usize>
where
    R: Rng + ?Sized,
{
    let mut indices = (0..n).collect::<Vec<_>>();
    indices.shuffle(rng);
    indices
}

/// Fills `out` with one bootstrap replicate of `sample`.
///
/// The replicate has the length of `out`; pass a buffer of `sample.len()`
/// for an ordinary bootstrap. Reusing the buffer across replicates avoids an
/// allocation per draw.
///
/// # Panics
///
/// Panics if `sample` is empty and `out` is not.
pub fn resample_into<T, R>(rng: &mut R, sample: &[T], out: &mut [T])
where
    T: Clone,
    R: Rng + ?Sized,
{
    assert!(
        out.is_empty() || !sample.is_empty(),
        "cannot resample from an empty sample"
    );
    for slot in out.iter_mut() {
        *slot = sample[rng.random_range(0..sample.len())].clone();
    }
}

/// Draws `reps` bootstrap replicates, each the size of `sample`.
pub fn bootstrap_replicates<T, R>(rng: &mut R, sample: &[T], reps: usize) -> Result<Vec<Vec<T>>>
where
    T: Clone,
    R: Rng + ?Sized,
{
    ensure_non_empty(sample, "sample")?;
    ensure_replicates(reps)?;
    (0..reps)
        .map(|_| sample_with_replacement(rng, sample, sample.len()))
        .collect()
}

fn ensure_fits(population: usize, requested: usize) -> Result<()> {
    if requested > population {
        return Err(ResampleError::SampleTooLarge {
            requested,
            population,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    fn rng() -> Pcg64 {
        Pcg64::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_without_replacement_too_large_fails() {
        let population = [1.0, 2.0, 3.0, 4.0];
        let result = sample_without_replacement(&mut rng(), &population, 12);
        assert_eq!(
            result,
            Err(ResampleError::SampleTooLarge {
                requested: 12,
                population: 4
            })
        );
    }

    #[test]
    fn test_without_replacement_is_distinct() {
        let population: Vec<u32> = (0..20).collect();
        let mut draws = sample_without_replacement(&mut rng(), &population, 20).unwrap();
        draws.sort_unstable();
        assert_eq!(draws, population);
    }

    #[test]
    fn test_with_replacement_stays_in_population() {
        let population = [10, 20, 30];
        let draws = sample_with_replacement(&mut rng(), &population, 100).unwrap();
        assert_eq!(draws.len(), 100);
        assert!(draws.iter().all(|d| population.contains(d)));
        assert!(sample_with_replacement::<i32, _>(&mut rng(), &[], 3).is_err());
    }

    #[test]
    fn test_weighted_respects_zero_weight() {
        let population = ['a', 'b', 'c'];
        let draws = sample_weighted(&mut rng(), &population, &[1.0, 0.0, 3.0], 500).unwrap();
        assert!(!draws.contains(&'b'));
        let c_count = draws.iter().filter(|d| **d == 'c').count();
        assert!(c_count > 300, "c drawn {c_count} times");
    }

    #[test]
    fn test_weighted_rejects_bad_weights() {
        let population = [1, 2];
        assert!(matches!(
            sample_weighted(&mut rng(), &population, &[1.0], 1),
            Err(ResampleError::LengthMismatch { .. })
        ));
        assert!(matches!(
            sample_weighted(&mut rng(), &population, &[0.0, 0.0], 1),
            Err(ResampleError::InvalidWeights { .. })
        ));
        assert!(matches!(
            sample_weighted_without_replacement(&mut rng(), &population, &[1.0, 0.0], 2),
            Err(ResampleError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn test_weighted_without_replacement_is_distinct() {
        let population = [1, 2, 3, 4, 5];
        let weights = [5.0, 4.0, 3.0, 2.0, 1.0];
        let mut draws =
            sample_weighted_without_replacement(&mut rng(), &population, &weights, 5).unwrap();
        draws.sort_unstable();
        assert_eq!(draws, population);
    }

    #[test]
    fn test_permutation_keeps_input_order() {
        let values: Vec<u32> = (0..50).collect();
        let permuted = permutation(&mut rng(), &values);
        assert_eq!(values, (0..50).collect::<Vec<_>>());
        assert_ne!(permuted, values);
        let mut sorted = permuted;
        sorted.sort_unstable();
        assert_eq!(sorted, values);
    }

    #[test]
    fn test_shuffle_in_place_mutates() {
        let mut values: Vec<u32> = (0..50).collect();
        shuffle_in_place(&mut rng(), &mut values);
        assert_ne!(values, (0..50).collect::<Vec<_>>());
        values.sort_unstable();
        assert_eq!(values, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_permuted_indices_is_permutation() {
        let mut indices = permuted_indices(&mut rng(), 30);
        indices.sort_unstable();
        assert_eq!(indices, (0..30).collect::<Vec<_>>());
    }

    #[test]
    fn test_bootstrap_replicates_have_sample_size() {
        let sample = [1.5, 2.5, 3.5, 4.5, 5.5];
        let replicates = bootstrap_replicates(&mut rng(), &sample, 25).unwrap();
        assert_eq!(replicates.len(), 25);
        assert!(replicates.iter().all(|r| r.len() == sample.len()));
        assert_eq!(
            bootstrap_replicates(&mut rng(), &sample, 0),
            Err(ResampleError::ZeroReplicates)
        );
    }

    #[test]
    fn test_same_seed_same_draws() {
        let sample: Vec<f64> = (0..10).map(f64::from).collect();
        let mut a = vec![0.0; 10];
        let mut b = vec![0.0; 10];
        resample_into(&mut rng(), &sample, &mut a);
        resample_into(&mut rng(), &sample, &mut b);
        assert_eq!(a, b);
    }
}
