use std::path::PathBuf;

use clap::Args;
use resampling_stats::{jackknife, statistic::Statistic};
use serde::Serialize;

use crate::{
    schema::report::Report,
    util::{self, Output, OutputArg},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct JackknifeArg {
    /// Path to a `sample` dataset JSON file
    dataset: PathBuf,
    /// Statistic to estimate (mean, median, std, var, p<0-100>)
    #[arg(long, default_value_t = Statistic::StdDev)]
    statistic: Statistic,
    #[clap(flatten)]
    output: OutputArg,
}

#[derive(Debug, Clone, Serialize)]
struct JackknifeParameters {
    statistic: Statistic,
}

pub(crate) fn run(arg: &JackknifeArg) -> anyhow::Result<()> {
    let JackknifeArg {
        dataset,
        statistic,
        output,
    } = arg;
    let data = util::read_dataset_file(dataset)?.data;
    let sample = data.sample()?;

    eprintln!(
        "Jackknife estimate of {statistic} over {} values...",
        sample.len()
    );
    let estimate = jackknife::jackknife(sample, |s| statistic.compute(s))?;

    eprintln!("  Full sample:    {:.4}", estimate.full_sample);
    eprintln!("  Jackknife mean: {:.4}", estimate.mean);
    eprintln!("  Std. error:     {:.4}", estimate.std_error);
    eprintln!("  Bias:           {:.4}", estimate.bias);
    eprintln!("  Bias-corrected: {:.4}", estimate.bias_corrected);

    let parameters = JackknifeParameters {
        statistic: *statistic,
    };
    let report = Report::new("jackknife", dataset, None, parameters, estimate);
    Output::save_json(&report, output.output.clone())?;
    Ok(())
}
