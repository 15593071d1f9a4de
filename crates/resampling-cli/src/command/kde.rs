use std::path::PathBuf;

use clap::Args;
use resampling_stats::density::{self, Bandwidth, Kde, Kernel};
use serde::Serialize;

use crate::{
    schema::report::Report,
    util::{self, Output, OutputArg},
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
enum KernelArg {
    #[default]
    Epanechnikov,
    Gaussian,
}

impl From<KernelArg> for Kernel {
    fn from(arg: KernelArg) -> Self {
        match arg {
            KernelArg::Epanechnikov => Kernel::Epanechnikov,
            KernelArg::Gaussian => Kernel::Gaussian,
        }
    }
}

fn parse_bandwidth(s: &str) -> Result<Bandwidth, String> {
    if s.eq_ignore_ascii_case("silverman") {
        return Ok(Bandwidth::Silverman);
    }
    s.parse::<f64>()
        .map(Bandwidth::Fixed)
        .map_err(|_| format!("expected `silverman` or a positive number, got `{s}`"))
}

#[derive(Debug, Clone, Args)]
pub(crate) struct KdeArg {
    /// Path to a `sample` dataset JSON file
    dataset: PathBuf,
    /// Smoothing kernel (epanechnikov or gaussian)
    #[arg(long, default_value = "epanechnikov")]
    kernel: KernelArg,
    /// Bandwidth: `silverman` or a fixed positive value
    #[arg(long, default_value = "silverman", value_parser = parse_bandwidth)]
    bandwidth: Bandwidth,
    /// Number of evaluation points
    #[arg(long, default_value_t = 200)]
    grid_points: usize,
    /// Grid extension beyond the sample range, in bandwidths
    #[arg(long, default_value_t = 3.0)]
    padding: f64,
    #[clap(flatten)]
    output: OutputArg,
}

#[derive(Debug, Clone, Serialize)]
struct KdeParameters {
    kernel: Kernel,
    bandwidth: Bandwidth,
    grid_points: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct DensityPoint {
    x: f64,
    density: f64,
}

#[derive(Debug, Clone, Serialize)]
struct KdeSummary {
    /// Bandwidth actually used
    bandwidth: f64,
    /// Local maxima of the estimate on the grid
    modes: Vec<DensityPoint>,
    grid: Vec<DensityPoint>,
}

pub(crate) fn run(arg: &KdeArg) -> anyhow::Result<()> {
    let KdeArg {
        dataset,
        kernel,
        bandwidth,
        grid_points,
        padding,
        output,
    } = arg;
    let data = util::read_dataset_file(dataset)?.data;
    let sample = data.sample()?;
    let kernel = Kernel::from(*kernel);

    let kde = Kde::new(sample, kernel, *bandwidth)?;
    let h = kde.bandwidth();
    let (min, max) = sample
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let xs = density::linspace(min - padding * h, max + padding * h, *grid_points);
    let grid = xs
        .iter()
        .zip(kde.evaluate_many(&xs))
        .map(|(&x, density)| DensityPoint { x, density })
        .collect::<Vec<_>>();
    let modes = local_maxima(&grid);

    eprintln!(
        "{kernel:?} KDE of {} values, bandwidth {h:.4}",
        sample.len()
    );
    for mode in &modes {
        eprintln!("  Mode at {:.4} (density {:.4})", mode.x, mode.density);
    }

    let parameters = KdeParameters {
        kernel,
        bandwidth: *bandwidth,
        grid_points: *grid_points,
    };
    let summary = KdeSummary {
        bandwidth: h,
        modes,
        grid,
    };
    let report = Report::new("kde", dataset, None, parameters, summary);
    Output::save_json(&report, output.output.clone())?;
    Ok(())
}

/// Grid points strictly higher than the previous point and at least as high
/// as the next one, so a flat top is reported once.
fn local_maxima(grid: &[DensityPoint]) -> Vec<DensityPoint> {
    grid.windows(3)
        .filter(|w| w[1].density > w[0].density && w[1].density >= w[2].density)
        .map(|w| w[1])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(densities: &[f64]) -> Vec<DensityPoint> {
        densities
            .iter()
            .enumerate()
            .map(|(i, &density)| DensityPoint {
                x: f64::from(u32::try_from(i).unwrap()),
                density,
            })
            .collect()
    }

    #[test]
    fn test_local_maxima() {
        let modes = local_maxima(&points(&[0.0, 1.0, 0.5, 0.2, 0.8, 0.8, 0.1]));
        let xs = modes.iter().map(|m| m.x).collect::<Vec<_>>();
        assert_eq!(xs, vec![1.0, 4.0]);
    }

    #[test]
    fn test_parse_bandwidth() {
        assert_eq!(parse_bandwidth("Silverman"), Ok(Bandwidth::Silverman));
        assert_eq!(parse_bandwidth("0.25"), Ok(Bandwidth::Fixed(0.25)));
        assert!(parse_bandwidth("wide").is_err());
    }

    #[test]
    fn test_parse_kernel() {
        assert_eq!("gaussian".parse::<KernelArg>().ok(), Some(KernelArg::Gaussian));
    }
}
