use std::path::PathBuf;

use clap::{Args, ValueEnum};
use resampling_stats::{
    multiple_testing::{self, PValueTable},
    ttest::{self, VarianceAssumption},
};
use serde::Serialize;

use crate::{
    schema::{dataset::Feature, report::Report},
    util::{self, Output, OutputArg, SeedArg},
};

const TOP_ROWS: usize = 15;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Method {
    /// Max-statistic step-down permutation adjustment (FWER)
    #[default]
    WestfallYoung,
    /// `min(1, k * p)` on parametric t-test p-values (FWER)
    Bonferroni,
    /// Benjamini-Hochberg on parametric t-test p-values (FDR)
    Bh,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct MultitestArg {
    /// Path to a `feature_matrix` dataset JSON file
    dataset: PathBuf,
    #[arg(long, value_enum, default_value_t = Method::WestfallYoung)]
    method: Method,
    /// Number of sample relabellings for Westfall-Young
    #[arg(long, default_value_t = 1000)]
    nperms: usize,
    /// Significance level applied to the adjusted p-values
    #[arg(long, default_value_t = 0.05)]
    alpha: f64,
    /// Use Welch's unequal-variance t statistic
    #[arg(long)]
    welch: bool,
    #[clap(flatten)]
    seed: SeedArg,
    #[clap(flatten)]
    output: OutputArg,
}

#[derive(Debug, Clone, Serialize)]
struct MultitestParameters {
    method: Method,
    #[serde(skip_serializing_if = "Option::is_none")]
    nperms: Option<usize>,
    alpha: f64,
    variance: VarianceAssumption,
}

#[derive(Debug, Clone, Serialize)]
struct FeatureRow {
    id: String,
    rank: usize,
    statistic: f64,
    unadjusted: f64,
    adjusted: f64,
    significant: bool,
}

#[derive(Debug, Clone, Serialize)]
struct MultitestSummary {
    significant: Vec<String>,
    /// Ordered from most to least significant
    features: Vec<FeatureRow>,
}

pub(crate) fn run(arg: &MultitestArg) -> anyhow::Result<()> {
    let MultitestArg {
        dataset,
        method,
        nperms,
        alpha,
        welch,
        seed,
        output,
    } = arg;
    let data = util::read_dataset_file(dataset)?.data;
    let (group_a_size, features) = data.feature_matrix()?;
    let variance = if *welch {
        VarianceAssumption::Welch
    } else {
        VarianceAssumption::Pooled
    };
    let matrix = features
        .iter()
        .map(|f| f.values.clone())
        .collect::<Vec<_>>();

    eprintln!(
        "Testing {} features with {method:?} adjustment...",
        features.len()
    );
    let (table, seed) = match method {
        Method::WestfallYoung => {
            let (mut rng, seed) = seed.rng();
            eprintln!("  {nperms} relabellings (seed {seed})");
            let table = multiple_testing::westfall_young(
                &mut rng,
                &matrix,
                group_a_size,
                |a: &[f64], b: &[f64]| ttest::t_statistic(a, b, variance),
                *nperms,
            )?;
            (table, Some(seed))
        }
        Method::Bonferroni | Method::Bh => {
            let (statistics, p_values) = parametric_tests(&matrix, group_a_size, variance)?;
            let untestable = statistics.iter().filter(|s| s.is_nan()).count();
            if untestable > 0 {
                eprintln!("  {untestable} features have an undefined statistic (p = 1)");
            }
            let adjusted = if *method == Method::Bonferroni {
                multiple_testing::bonferroni(&p_values)?
            } else {
                multiple_testing::benjamini_hochberg(&p_values)?
            };
            (
                PValueTable::from_adjustment(&statistics, &p_values, &adjusted)?,
                None,
            )
        }
    };

    let summary = summarize(&table, features, *alpha);
    print_top_rows(&summary);

    let parameters = MultitestParameters {
        method: *method,
        nperms: (*method == Method::WestfallYoung).then_some(*nperms),
        alpha: *alpha,
        variance,
    };
    let report = Report::new("multitest", dataset, seed, parameters, summary);
    Output::save_json(&report, output.output.clone())?;
    Ok(())
}

/// Per-feature t statistics and two-sided p-values. A feature whose statistic
/// is undefined (zero variance in both groups) gets p = 1.
fn parametric_tests(
    matrix: &[Vec<f64>],
    group_a_size: usize,
    variance: VarianceAssumption,
) -> anyhow::Result<(Vec<f64>, Vec<f64>)> {
    let mut statistics = Vec::with_capacity(matrix.len());
    let mut p_values = Vec::with_capacity(matrix.len());
    for (i, row) in matrix.iter().enumerate() {
        anyhow::ensure!(
            group_a_size <= row.len(),
            "Group A size {group_a_size} exceeds the {} samples of feature #{i}",
            row.len()
        );
        let (a, b) = row.split_at(group_a_size);
        let test = ttest::t_test_ind(a, b, variance)?;
        statistics.push(test.statistic);
        p_values.push(if test.p_value.is_nan() {
            1.0
        } else {
            test.p_value
        });
    }
    Ok((statistics, p_values))
}

fn summarize(table: &PValueTable, features: &[Feature], alpha: f64) -> MultitestSummary {
    let features = table
        .by_rank()
        .into_iter()
        .map(|row| FeatureRow {
            id: features[row.feature].id.clone(),
            rank: row.rank,
            statistic: row.statistic,
            unadjusted: row.unadjusted,
            adjusted: row.adjusted,
            significant: row.adjusted <= alpha,
        })
        .collect::<Vec<_>>();
    let significant = features
        .iter()
        .filter(|row| row.significant)
        .map(|row| row.id.clone())
        .collect();
    MultitestSummary {
        significant,
        features,
    }
}

fn print_top_rows(summary: &MultitestSummary) {
    eprintln!();
    eprintln!(
        "  {:>4} {:<16} {:>10} {:>12} {:>12}",
        "Rank", "Feature", "Statistic", "Unadjusted", "Adjusted"
    );
    eprintln!("  {}", "-".repeat(58));
    for row in summary.features.iter().take(TOP_ROWS) {
        eprintln!(
            "  {:>4} {:<16} {:>10.4} {:>12.4} {:>12.4}{}",
            row.rank,
            row.id,
            row.statistic,
            row.unadjusted,
            row.adjusted,
            if row.significant { " *" } else { "" }
        );
    }
    eprintln!();
    eprintln!("Significant features: {}", summary.significant.len());
}
