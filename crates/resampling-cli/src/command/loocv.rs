use std::path::PathBuf;

use clap::Args;
use resampling_stats::cross_validation::{self, ModelSelection, Polynomial};
use serde::Serialize;

use crate::{
    schema::report::Report,
    util::{self, Output, OutputArg},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct LoocvArg {
    /// Path to a `regression` dataset JSON file
    dataset: PathBuf,
    /// Highest polynomial degree to consider (degrees 0..=max are scored)
    #[arg(long, default_value_t = 6)]
    max_degree: usize,
    #[clap(flatten)]
    output: OutputArg,
}

#[derive(Debug, Clone, Serialize)]
struct LoocvParameters {
    max_degree: usize,
}

#[derive(Debug, Clone, Serialize)]
struct LoocvSummary {
    #[serde(flatten)]
    selection: ModelSelection,
    /// Best-degree polynomial refitted on every point
    best_fit: Polynomial,
}

pub(crate) fn run(arg: &LoocvArg) -> anyhow::Result<()> {
    let LoocvArg {
        dataset,
        max_degree,
        output,
    } = arg;
    let data = util::read_dataset_file(dataset)?.data;
    let (x, y) = data.regression()?;

    eprintln!(
        "Scoring polynomial degrees 0..={max_degree} on {} points by leave-one-out cross-validation...",
        x.len()
    );
    let degrees = (0..=*max_degree).collect::<Vec<_>>();
    let selection = cross_validation::select_polynomial_degree(x, y, &degrees)?;
    let best_fit = Polynomial::fit(x, y, selection.best_degree)?;

    eprintln!();
    eprintln!("  {:>6} {:>14} {:>14}", "Degree", "In-sample RSS", "LOOCV RSS");
    eprintln!("  {}", "-".repeat(36));
    for candidate in &selection.candidates {
        eprintln!(
            "  {:>6} {:>14.4} {:>14.4}{}",
            candidate.degree,
            candidate.in_sample_rss,
            candidate.loocv_rss,
            if candidate.degree == selection.best_degree {
                " *"
            } else {
                ""
            }
        );
    }
    eprintln!();
    eprintln!("Best degree: {}", selection.best_degree);
    eprintln!("  Coefficients: {:.4?}", best_fit.coefficients);

    let summary = LoocvSummary {
        selection,
        best_fit,
    };
    let parameters = LoocvParameters {
        max_degree: *max_degree,
    };
    let report = Report::new("loocv", dataset, None, parameters, summary);
    Output::save_json(&report, output.output.clone())?;
    Ok(())
}
