use std::path::PathBuf;

use clap::Args;
use resampling_stats::{density::Ecdf, descriptive::DescriptiveStats};
use serde::Serialize;

use crate::{
    schema::report::Report,
    util::{self, Output, OutputArg},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct EcdfArg {
    /// Path to a `sample` dataset JSON file
    dataset: PathBuf,
    /// Additional points at which to evaluate the ECDF (comma-separated)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    at: Vec<f64>,
    #[clap(flatten)]
    output: OutputArg,
}

#[derive(Debug, Clone, Serialize)]
struct EcdfParameters {
    at: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct EcdfPoint {
    x: f64,
    p: f64,
}

#[derive(Debug, Clone, Serialize)]
struct EcdfSummary {
    stats: Option<DescriptiveStats>,
    /// Step locations and heights, ascending
    points: Vec<EcdfPoint>,
    evaluations: Vec<EcdfPoint>,
}

pub(crate) fn run(arg: &EcdfArg) -> anyhow::Result<()> {
    let EcdfArg {
        dataset,
        at,
        output,
    } = arg;
    let data = util::read_dataset_file(dataset)?.data;
    let sample = data.sample()?;

    let ecdf = Ecdf::new(sample.to_vec())?;
    let points = ecdf
        .points()
        .map(|(x, p)| EcdfPoint { x, p })
        .collect::<Vec<_>>();
    let evaluations = at
        .iter()
        .map(|&x| EcdfPoint {
            x,
            p: ecdf.evaluate(x),
        })
        .collect::<Vec<_>>();

    eprintln!("ECDF of {} values", ecdf.len());
    for point in &evaluations {
        eprintln!("  F({:.4}) = {:.4}", point.x, point.p);
    }

    let summary = EcdfSummary {
        stats: DescriptiveStats::new(sample.iter().copied()),
        points,
        evaluations,
    };
    let parameters = EcdfParameters { at: at.clone() };
    let report = Report::new("ecdf", dataset, None, parameters, summary);
    Output::save_json(&report, output.output.clone())?;
    Ok(())
}
