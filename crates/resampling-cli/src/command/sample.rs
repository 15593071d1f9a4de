use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use rand::Rng;
use resampling_stats::sampling;
use serde::Serialize;

use crate::{
    schema::report::Report,
    util::{self, Output, OutputArg, SeedArg},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct SampleArg {
    /// Path to a `sample` dataset JSON file
    dataset: PathBuf,
    /// Number of values to draw (defaults to the population size)
    #[arg(long)]
    size: Option<usize>,
    /// Draw distinct positions instead of sampling with replacement
    #[arg(long)]
    without_replacement: bool,
    /// Per-value selection weights (comma-separated, one per value)
    #[arg(long, value_delimiter = ',')]
    weights: Vec<f64>,
    /// Return a random permutation of the whole population
    #[arg(long, conflicts_with_all = ["size", "without_replacement", "weights"])]
    shuffle: bool,
    #[clap(flatten)]
    seed: SeedArg,
    #[clap(flatten)]
    output: OutputArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Scheme {
    WithReplacement,
    WithoutReplacement,
    WeightedWithReplacement,
    WeightedWithoutReplacement,
    Shuffle,
}

#[derive(Debug, Clone, Serialize)]
struct SampleParameters {
    scheme: Scheme,
    size: usize,
}

#[derive(Debug, Clone, Serialize)]
struct SampleSummary {
    values: Vec<f64>,
}

pub(crate) fn run(arg: &SampleArg) -> anyhow::Result<()> {
    let data = util::read_dataset_file(&arg.dataset)?.data;
    let population = data.sample()?;
    let size = arg.size.unwrap_or(population.len());
    let scheme = scheme(arg);
    let (mut rng, seed) = arg.seed.rng();

    eprintln!(
        "Drawing {size} of {} values ({scheme:?}, seed {seed})",
        population.len()
    );
    let values = draw(&mut rng, population, &arg.weights, size, scheme)
        .context("Failed to draw sample")?;

    let parameters = SampleParameters {
        scheme,
        size: values.len(),
    };
    let report = Report::new(
        "sample",
        &arg.dataset,
        Some(seed),
        parameters,
        SampleSummary { values },
    );
    Output::save_json(&report, arg.output.output.clone())?;
    Ok(())
}

fn scheme(arg: &SampleArg) -> Scheme {
    match (arg.shuffle, arg.weights.is_empty(), arg.without_replacement) {
        (true, _, _) => Scheme::Shuffle,
        (false, true, false) => Scheme::WithReplacement,
        (false, true, true) => Scheme::WithoutReplacement,
        (false, false, false) => Scheme::WeightedWithReplacement,
        (false, false, true) => Scheme::WeightedWithoutReplacement,
    }
}

fn draw<R>(
    rng: &mut R,
    population: &[f64],
    weights: &[f64],
    size: usize,
    scheme: Scheme,
) -> resampling_stats::Result<Vec<f64>>
where
    R: Rng + ?Sized,
{
    match scheme {
        Scheme::WithReplacement => sampling::sample_with_replacement(rng, population, size),
        Scheme::WithoutReplacement => sampling::sample_without_replacement(rng, population, size),
        Scheme::WeightedWithReplacement => {
            sampling::sample_weighted(rng, population, weights, size)
        }
        Scheme::WeightedWithoutReplacement => {
            sampling::sample_weighted_without_replacement(rng, population, weights, size)
        }
        Scheme::Shuffle => Ok(sampling::permutation(rng, population)),
    }
}
