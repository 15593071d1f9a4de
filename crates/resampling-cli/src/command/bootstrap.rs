use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use resampling_stats::{
    bootstrap::{self, BootstrapDistribution, ConfidenceInterval},
    histogram::Histogram,
    statistic::Statistic,
};
use serde::Serialize;

use crate::{
    schema::{dataset::DatasetData, report::Report},
    util::{self, Output, OutputArg, SeedArg},
};

const HISTOGRAM_BINS: usize = 20;

#[derive(Debug, Clone, Args)]
pub(crate) struct BootstrapArg {
    /// Path to a `sample` or `two_sample` dataset JSON file
    dataset: PathBuf,
    /// Statistic to bootstrap (mean, median, std, var, p<0-100>)
    #[arg(long, default_value_t = Statistic::Mean)]
    statistic: Statistic,
    /// Number of bootstrap replicates
    #[arg(long, default_value_t = 10000)]
    reps: usize,
    /// Confidence level of the percentile interval
    #[arg(long, default_value_t = 0.95)]
    confidence: f64,
    /// Include every replicate in the report
    #[arg(long)]
    keep_replicates: bool,
    #[clap(flatten)]
    seed: SeedArg,
    #[clap(flatten)]
    output: OutputArg,
}

#[derive(Debug, Clone, Serialize)]
struct BootstrapParameters {
    statistic: Statistic,
    /// `x - y` for two-sample datasets
    difference: bool,
    reps: usize,
    confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
struct BootstrapSummary {
    observed: f64,
    mean: f64,
    standard_error: f64,
    interval: ConfidenceInterval,
    #[serde(skip_serializing_if = "Option::is_none")]
    replicates: Option<Vec<f64>>,
}

pub(crate) fn run(arg: &BootstrapArg) -> anyhow::Result<()> {
    let BootstrapArg {
        dataset,
        statistic,
        reps,
        confidence,
        keep_replicates,
        seed,
        output,
    } = arg;
    let data = util::read_dataset_file(dataset)?.data;
    let (mut rng, seed) = seed.rng();
    let stat = |s: &[f64]| statistic.compute(s);

    eprintln!("Bootstrapping {statistic} with {reps} replicates (seed {seed})...");
    let (distribution, difference) = match &data {
        DatasetData::Sample { values } => (
            bootstrap::bootstrap(&mut rng, values, stat, *reps)?,
            false,
        ),
        DatasetData::TwoSample { x, y } => (
            bootstrap::bootstrap_difference(&mut rng, x, y, stat, *reps)?,
            true,
        ),
        other => anyhow::bail!(
            "Expected a `sample` or `two_sample` dataset, found `{}`",
            other.kind()
        ),
    };

    let interval = distribution
        .central_interval(*confidence)
        .context("Failed to compute the confidence interval")?;
    let summary = BootstrapSummary {
        observed: distribution.observed,
        mean: distribution.mean()?,
        standard_error: distribution.standard_error()?,
        interval,
        replicates: keep_replicates.then(|| distribution.replicates().to_vec()),
    };
    print_summary(&distribution, &summary, *confidence);

    let parameters = BootstrapParameters {
        statistic: *statistic,
        difference,
        reps: *reps,
        confidence: *confidence,
    };
    let report = Report::new("bootstrap", dataset, Some(seed), parameters, summary);
    Output::save_json(&report, output.output.clone())?;
    Ok(())
}

fn print_summary(
    distribution: &BootstrapDistribution,
    summary: &BootstrapSummary,
    confidence: f64,
) {
    eprintln!();
    eprintln!("Replicate distribution:");
    util::print_histogram(&Histogram::from_sorted(
        distribution.replicates(),
        HISTOGRAM_BINS,
    ));
    eprintln!();
    eprintln!("  Observed:       {:.4}", summary.observed);
    eprintln!("  Bootstrap mean: {:.4}", summary.mean);
    eprintln!("  Std. error:     {:.4}", summary.standard_error);
    eprintln!(
        "  {:.1}% CI:       [{:.4}, {:.4}]",
        confidence * 100.0,
        summary.interval.lower,
        summary.interval.upper
    );
}
