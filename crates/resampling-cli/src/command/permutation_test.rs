use std::path::PathBuf;

use clap::{Args, ValueEnum};
use resampling_stats::{
    histogram::Histogram,
    permutation::{self, Alternative},
    statistic::Statistic,
    ttest::{self, TTest, VarianceAssumption},
};
use serde::Serialize;

use crate::{
    schema::report::Report,
    util::{self, Output, OutputArg, SeedArg},
};

const HISTOGRAM_BINS: usize = 20;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlternativeArg {
    #[default]
    TwoSided,
    Greater,
    Less,
}

impl From<AlternativeArg> for Alternative {
    fn from(arg: AlternativeArg) -> Self {
        match arg {
            AlternativeArg::TwoSided => Alternative::TwoSided,
            AlternativeArg::Greater => Alternative::Greater,
            AlternativeArg::Less => Alternative::Less,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct PermutationTestArg {
    /// Path to a `two_sample` dataset JSON file
    dataset: PathBuf,
    /// Statistic compared between the groups as `stat(x) - stat(y)`
    #[arg(long, default_value_t = Statistic::Mean)]
    statistic: Statistic,
    /// Number of random relabellings
    #[arg(long, default_value_t = 10000)]
    reps: usize,
    #[arg(long, value_enum, default_value_t = AlternativeArg::TwoSided)]
    alternative: AlternativeArg,
    /// Use Welch's unequal-variance t-test for the parametric comparison
    #[arg(long)]
    welch: bool,
    #[clap(flatten)]
    seed: SeedArg,
    #[clap(flatten)]
    output: OutputArg,
}

#[derive(Debug, Clone, Serialize)]
struct PermutationParameters {
    statistic: Statistic,
    reps: usize,
    alternative: Alternative,
    variance: VarianceAssumption,
}

#[derive(Debug, Clone, Serialize)]
struct PermutationSummary {
    observed: f64,
    p_value: f64,
    /// Classical t-test on the same data, when both groups have two or more values
    t_test: Option<TTest>,
}

pub(crate) fn run(arg: &PermutationTestArg) -> anyhow::Result<()> {
    let PermutationTestArg {
        dataset,
        statistic,
        reps,
        alternative,
        welch,
        seed,
        output,
    } = arg;
    let data = util::read_dataset_file(dataset)?.data;
    let (x, y) = data.two_sample()?;
    let (mut rng, seed) = seed.rng();
    let alternative = Alternative::from(*alternative);
    let variance = if *welch {
        VarianceAssumption::Welch
    } else {
        VarianceAssumption::Pooled
    };

    eprintln!(
        "Permutation test of {statistic} difference, {} vs {} values, {reps} relabellings (seed {seed})...",
        x.len(),
        y.len()
    );
    let test = permutation::permutation_test(
        &mut rng,
        x,
        y,
        |a: &[f64], b: &[f64]| statistic.difference(a, b),
        *reps,
        alternative,
    )?;
    let t_test = ttest::t_test_ind(x, y, variance).ok();

    eprintln!();
    eprintln!("Null distribution:");
    util::print_histogram(&Histogram::from_sorted(
        &test.null_distribution,
        HISTOGRAM_BINS,
    ));
    eprintln!();
    eprintln!("  Observed:    {:.4}", test.observed);
    eprintln!("  p-value:     {:.4} ({alternative:?})", test.p_value);
    if let Some(t) = &t_test {
        eprintln!(
            "  t-test:      t = {:.4}, df = {:.1}, p = {:.4}",
            t.statistic, t.df, t.p_value
        );
    }

    let parameters = PermutationParameters {
        statistic: *statistic,
        reps: *reps,
        alternative,
        variance,
    };
    let summary = PermutationSummary {
        observed: test.observed,
        p_value: test.p_value,
        t_test,
    };
    let report = Report::new("permutation-test", dataset, Some(seed), parameters, summary);
    Output::save_json(&report, output.output.clone())?;
    Ok(())
}
