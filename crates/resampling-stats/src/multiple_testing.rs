//! Multiple-testing correction.
//!
//! When many features are tested at once, per-feature p-values must be
//! adjusted to control the family-wise error rate (FWER) or the false
//! discovery rate (FDR).
//!
//! - [`bonferroni`]: `min(1, k · p)`. Valid under any dependence but
//!   conservative when the features are correlated.
//! - [`benjamini_hochberg`]: step-up FDR control.
//! - [`westfall_young`]: max-statistic step-down permutation procedure. The
//!   same relabelling of samples is applied to every feature, so the
//!   correlation between features is carried into the null distribution.
//!   Costs `nperms × k` statistic evaluations.

use rand::Rng;
use serde::Serialize;

use crate::{
    error::{ResampleError, Result, ensure_non_empty, ensure_replicates, ensure_same_len},
    sampling,
};

/// Bonferroni adjustment, `min(1, k · p)`.
///
/// ```
/// use resampling_stats::multiple_testing::bonferroni;
///
/// let adjusted = bonferroni(&[0.01, 0.04, 0.5]).unwrap();
/// assert_eq!(adjusted, vec![0.03, 0.12, 1.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn bonferroni(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let k = p_values.len() as f64;
    Ok(p_values.iter().map(|&p| (p * k).min(1.0)).collect())
}

/// Benjamini-Hochberg step-up adjustment.
///
/// Sorts p-values, scales each by `k / rank`, and enforces monotonicity with
/// a running minimum from the largest p-value down.
#[expect(clippy::cast_precision_loss)]
pub fn benjamini_hochberg(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let k = p_values.len();
    let mut order = (0..k).collect::<Vec<_>>();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let mut adjusted = vec![0.0; k];
    let mut running_min = 1.0_f64;
    for (rank, &i) in order.iter().enumerate().rev() {
        let scaled = p_values[i] * k as f64 / (rank + 1) as f64;
        running_min = running_min.min(scaled);
        adjusted[i] = running_min;
    }
    Ok(adjusted)
}

fn validate_p_values(p_values: &[f64]) -> Result<()> {
    match p_values.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        Some(&value) => Err(ResampleError::InvalidPValue { value }),
        None => Ok(()),
    }
}

/// One feature's row in a [`PValueTable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PValueRow {
    /// Position of the feature in the input.
    pub feature: usize,
    /// Significance rank, 0 for the largest `|statistic|`.
    pub rank: usize,
    pub statistic: f64,
    pub unadjusted: f64,
    pub adjusted: f64,
}

/// Unadjusted and adjusted p-values per feature, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct PValueTable {
    pub rows: Vec<PValueRow>,
}

impl PValueTable {
    /// Builds a table from precomputed per-feature values.
    pub fn from_adjustment(
        statistics: &[f64],
        unadjusted: &[f64],
        adjusted: &[f64],
    ) -> Result<Self> {
        ensure_same_len(statistics, unadjusted, "statistics and p-values")?;
        ensure_same_len(statistics, adjusted, "statistics and adjusted p-values")?;
        let ranks = ranks_by_magnitude(statistics);
        let rows = (0..statistics.len())
            .map(|feature| PValueRow {
                feature,
                rank: ranks[feature],
                statistic: statistics[feature],
                unadjusted: unadjusted[feature],
                adjusted: adjusted[feature],
            })
            .collect();
        Ok(Self { rows })
    }

    /// Rows ordered from most to least significant statistic.
    #[must_use]
    pub fn by_rank(&self) -> Vec<PValueRow> {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|row| row.rank);
        rows
    }

    /// Features whose adjusted p-value is at most `alpha`.
    #[must_use]
    pub fn significant(&self, alpha: f64) -> Vec<usize> {
        self.rows
            .iter()
            .filter(|row| row.adjusted <= alpha)
            .map(|row| row.feature)
            .collect()
    }
}

/// Feature indices ordered by descending `|statistic|`, `NaN` statistics last.
fn order_by_magnitude(statistics: &[f64]) -> Vec<usize> {
    let mut order = (0..statistics.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        let (a, b) = (statistics[a], statistics[b]);
        a.is_nan()
            .cmp(&b.is_nan())
            .then_with(|| b.abs().total_cmp(&a.abs()))
    });
    order
}

fn ranks_by_magnitude(statistics: &[f64]) -> Vec<usize> {
    let mut ranks = vec![0; statistics.len()];
    for (rank, feature) in order_by_magnitude(statistics).into_iter().enumerate() {
        ranks[feature] = rank;
    }
    ranks
}

/// Westfall-Young max-statistic step-down adjustment.
///
/// `features` holds one row per feature; every row has the same columns
/// (samples), and the first `group_a_size` columns form group A. `statistic`
/// compares group A with group B for one feature (e.g. a t statistic).
///
/// Each permutation relabels the samples once, recomputes all `k` statistics,
/// and takes a running maximum of `|statistic|` from the least significant
/// rank upward. The fraction of permutations in which that running maximum
/// reaches the observed `|statistic|` at a rank is its adjusted p-value,
/// made non-decreasing in rank order. The unadjusted p-value of a feature is
/// its own marginal permutation p-value.
///
/// A feature whose observed statistic is `NaN` (a constant row under a t
/// statistic, for instance) cannot be tested. It is ranked last and both of
/// its p-values are 1.
///
/// ```
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg64;
/// use resampling_stats::{multiple_testing, synthetic, ttest};
///
/// let mut rng = Pcg64::seed_from_u64(5);
/// let features = synthetic::expression_matrix(&mut rng, 20, 10, 10, 2, 3.0).unwrap();
/// let stat = |a: &[f64], b: &[f64]| ttest::t_statistic(a, b, ttest::VarianceAssumption::Pooled);
/// let table = multiple_testing::westfall_young(&mut rng, &features, 10, stat, 500).unwrap();
/// assert!(table.rows.iter().all(|row| row.adjusted >= row.unadjusted));
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn westfall_young<R, F>(
    rng: &mut R,
    features: &[Vec<f64>],
    group_a_size: usize,
    statistic: F,
    nperms: usize,
) -> Result<PValueTable>
where
    R: Rng + ?Sized,
    F: Fn(&[f64], &[f64]) -> f64,
{
    ensure_non_empty(features, "feature matrix")?;
    ensure_replicates(nperms)?;
    let num_samples = features[0].len();
    for row in features {
        ensure_same_len(&features[0], row, "feature rows")?;
    }
    if group_a_size == 0 || group_a_size >= num_samples {
        return Err(ResampleError::InsufficientData {
            what: "each group",
            needed: 1,
            got: group_a_size.min(num_samples.saturating_sub(group_a_size)),
        });
    }

    let k = features.len();
    let observed = features
        .iter()
        .map(|row| {
            let (a, b) = row.split_at(group_a_size);
            statistic(a, b)
        })
        .collect::<Vec<_>>();
    let observed_abs = observed.iter().map(|s| s.abs()).collect::<Vec<_>>();
    let order = order_by_magnitude(&observed);

    let mut rank_counts = vec![0_usize; k];
    let mut marginal_counts = vec![0_usize; k];
    let mut permuted = vec![0.0; num_samples];
    let mut permuted_abs = vec![0.0; k];
    for _ in 0..nperms {
        let columns = sampling::permuted_indices(rng, num_samples);
        for (feature, row) in features.iter().enumerate() {
            for (slot, &col) in permuted.iter_mut().zip(&columns) {
                *slot = row[col];
            }
            let (a, b) = permuted.split_at(group_a_size);
            permuted_abs[feature] = statistic(a, b).abs();
            if observed_abs[feature].is_nan() || permuted_abs[feature] >= observed_abs[feature] {
                marginal_counts[feature] += 1;
            }
        }

        // Successive maxima from the least significant rank upward.
        // `f64::max` skips NaN, so untestable permuted values never count.
        let mut running_max = f64::NEG_INFINITY;
        for (rank, &feature) in order.iter().enumerate().rev() {
            running_max = running_max.max(permuted_abs[feature]);
            if observed_abs[feature].is_nan() || running_max >= observed_abs[feature] {
                rank_counts[rank] += 1;
            }
        }
    }

    let nperms = nperms as f64;
    let mut adjusted = vec![0.0; k];
    let mut monotone = 0.0_f64;
    for (rank, &feature) in order.iter().enumerate() {
        monotone = monotone.max(rank_counts[rank] as f64 / nperms);
        adjusted[feature] = monotone;
    }
    let unadjusted = marginal_counts
        .iter()
        .map(|&c| c as f64 / nperms)
        .collect::<Vec<_>>();

    PValueTable::from_adjustment(&observed, &unadjusted, &adjusted)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::{
        synthetic,
        ttest::{self, VarianceAssumption},
    };

    fn t_stat(a: &[f64], b: &[f64]) -> f64 {
        ttest::t_statistic(a, b, VarianceAssumption::Pooled)
    }

    #[test]
    fn test_bonferroni_bounds() {
        let p = [0.0, 0.001, 0.02, 0.3, 0.9, 1.0];
        let adjusted = bonferroni(&p).unwrap();
        for (raw, adj) in p.iter().zip(&adjusted) {
            assert!(adj >= raw);
            assert!(*adj <= 1.0);
        }
        assert_eq!(adjusted[1], 0.006);
    }

    #[test]
    fn test_rejects_invalid_p_values() {
        assert_eq!(
            bonferroni(&[0.5, 1.5]),
            Err(ResampleError::InvalidPValue { value: 1.5 })
        );
        assert!(benjamini_hochberg(&[f64::NAN]).is_err());
        assert_eq!(bonferroni(&[]).unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn test_benjamini_hochberg_known_values() {
        let adjusted = benjamini_hochberg(&[0.01, 0.04, 0.03, 0.005]).unwrap();
        let expected = [0.02, 0.04, 0.04, 0.02];
        for (a, e) in adjusted.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{adjusted:?}");
        }
    }

    #[test]
    fn test_westfall_young_invariants() {
        let mut rng = Pcg64::seed_from_u64(31);
        let features = synthetic::expression_matrix(&mut rng, 30, 8, 8, 3, 2.5).unwrap();
        let table = westfall_young(&mut rng, &features, 8, t_stat, 400).unwrap();

        assert_eq!(table.rows.len(), 30);
        for row in &table.rows {
            assert!(row.adjusted >= row.unadjusted, "{row:?}");
            assert!((0.0..=1.0).contains(&row.adjusted));
        }
        let by_rank = table.by_rank();
        assert!(by_rank.windows(2).all(|w| w[0].adjusted <= w[1].adjusted));
        assert!(
            by_rank
                .windows(2)
                .all(|w| w[0].statistic.abs() >= w[1].statistic.abs())
        );
    }

    #[test]
    fn test_westfall_young_finds_shifted_features() {
        let mut rng = Pcg64::seed_from_u64(32);
        let features = synthetic::expression_matrix(&mut rng, 20, 10, 10, 2, 4.0).unwrap();
        let table = westfall_young(&mut rng, &features, 10, t_stat, 1000).unwrap();
        let significant = table.significant(0.05);
        assert!(significant.contains(&0) && significant.contains(&1), "{significant:?}");
        assert!(significant.len() <= 3, "{significant:?}");
    }

    #[test]
    fn test_westfall_young_validates_groups() {
        let mut rng = Pcg64::seed_from_u64(33);
        let features = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]];
        assert!(matches!(
            westfall_young(&mut rng, &features, 1, t_stat, 10),
            Err(ResampleError::LengthMismatch { .. })
        ));
        let features = vec![vec![1.0, 2.0, 3.0]];
        assert!(matches!(
            westfall_young(&mut rng, &features, 3, t_stat, 10),
            Err(ResampleError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_westfall_young_constant_feature_is_not_significant() {
        let mut rng = Pcg64::seed_from_u64(34);
        let features = vec![
            vec![1.0, 1.2, 0.9, 1.1, 1.0, 1.3, 0.8, 1.05],
            vec![5.0; 8],
            vec![1.0, 1.1, 0.9, 1.2, 4.0, 4.2, 3.9, 4.1],
        ];
        let table = westfall_young(&mut rng, &features, 4, t_stat, 500).unwrap();

        let constant = table.rows[1];
        assert!(constant.statistic.is_nan());
        assert_eq!(constant.rank, 2);
        assert_eq!(constant.unadjusted, 1.0);
        assert_eq!(constant.adjusted, 1.0);
        assert_eq!(table.rows[2].rank, 0);
        assert!(!table.significant(0.05).contains(&1));
        for row in &table.rows {
            assert!(row.adjusted >= row.unadjusted, "{row:?}");
        }
    }

    #[test]
    fn test_table_from_adjustment_ranks() {
        let table = PValueTable::from_adjustment(
            &[0.5, -3.0, 2.0],
            &[0.6, 0.01, 0.05],
            &[1.0, 0.03, 0.15],
        )
        .unwrap();
        let ranks = table.rows.iter().map(|r| r.rank).collect::<Vec<_>>();
        assert_eq!(ranks, vec![2, 0, 1]);
        assert_eq!(table.significant(0.05), vec![1]);
    }

    #[test]
    fn test_table_ranks_nan_statistics_last() {
        let table = PValueTable::from_adjustment(
            &[f64::NAN, 1.0, f64::INFINITY],
            &[1.0, 0.3, 0.0],
            &[1.0, 0.6, 0.0],
        )
        .unwrap();
        let ranks = table.rows.iter().map(|r| r.rank).collect::<Vec<_>>();
        assert_eq!(ranks, vec![2, 1, 0]);
    }
}
