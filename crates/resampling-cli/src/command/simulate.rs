use chrono::Utc;
use clap::{Args, Subcommand};
use resampling_stats::synthetic;

use crate::{
    schema::dataset::{Dataset, DatasetData, Feature},
    util::{Output, OutputArg, SeedArg},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct SimulateArg {
    #[command(subcommand)]
    kind: SimulateKind,
}

#[derive(Debug, Clone, Subcommand)]
enum SimulateKind {
    /// A single normal sample
    Normal(#[clap(flatten)] NormalArg),
    /// A two-cluster normal mixture
    Bimodal(#[clap(flatten)] BimodalArg),
    /// Two normal groups with different means
    TwoSample(#[clap(flatten)] TwoSampleArg),
    /// Noisy polynomial regression data
    Regression(#[clap(flatten)] RegressionArg),
    /// Feature matrix with a few truly shifted features
    Expression(#[clap(flatten)] ExpressionArg),
}

#[derive(Debug, Clone, Args)]
struct NormalArg {
    #[arg(long, default_value_t = 100)]
    size: usize,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    mean: f64,
    #[arg(long, default_value_t = 1.0)]
    std_dev: f64,
    #[clap(flatten)]
    seed: SeedArg,
    #[clap(flatten)]
    output: OutputArg,
}

#[derive(Debug, Clone, Args)]
struct BimodalArg {
    #[arg(long, default_value_t = 200)]
    size: usize,
    /// Center of the first cluster
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    left: f64,
    /// Center of the second cluster
    #[arg(long, default_value_t = 4.0, allow_negative_numbers = true)]
    right: f64,
    /// Spread of each cluster
    #[arg(long, default_value_t = 0.5)]
    std_dev: f64,
    #[clap(flatten)]
    seed: SeedArg,
    #[clap(flatten)]
    output: OutputArg,
}

#[derive(Debug, Clone, Args)]
struct TwoSampleArg {
    #[arg(long, default_value_t = 30)]
    size_x: usize,
    #[arg(long, default_value_t = 30)]
    size_y: usize,
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    mean_x: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    mean_y: f64,
    #[arg(long, default_value_t = 1.0)]
    std_dev: f64,
    #[clap(flatten)]
    seed: SeedArg,
    #[clap(flatten)]
    output: OutputArg,
}

#[derive(Debug, Clone, Args)]
struct RegressionArg {
    #[arg(long, default_value_t = 50)]
    size: usize,
    /// Polynomial coefficients, constant term first (comma-separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = [1.0, -2.0, 3.0],
        allow_negative_numbers = true
    )]
    coefficients: Vec<f64>,
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    x_min: f64,
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    x_max: f64,
    /// Standard deviation of the Gaussian noise added to each response
    #[arg(long, default_value_t = 0.3)]
    noise: f64,
    #[clap(flatten)]
    seed: SeedArg,
    #[clap(flatten)]
    output: OutputArg,
}

#[derive(Debug, Clone, Args)]
struct ExpressionArg {
    /// Number of features (rows)
    #[arg(long, default_value_t = 100)]
    features: usize,
    #[arg(long, default_value_t = 10)]
    group_a: usize,
    #[arg(long, default_value_t = 10)]
    group_b: usize,
    /// Number of leading features whose group-B mean is shifted
    #[arg(long, default_value_t = 10)]
    shifted: usize,
    /// Size of the group-B shift
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    effect: f64,
    #[clap(flatten)]
    seed: SeedArg,
    #[clap(flatten)]
    output: OutputArg,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let (seed, output, data) = match &arg.kind {
        SimulateKind::Normal(arg) => {
            let (mut rng, seed) = arg.seed.rng();
            let values = synthetic::normal_sample(&mut rng, arg.mean, arg.std_dev, arg.size)?;
            (seed, &arg.output, DatasetData::Sample { values })
        }
        SimulateKind::Bimodal(arg) => {
            let (mut rng, seed) = arg.seed.rng();
            let values =
                synthetic::bimodal_sample(&mut rng, arg.left, arg.right, arg.std_dev, arg.size)?;
            (seed, &arg.output, DatasetData::Sample { values })
        }
        SimulateKind::TwoSample(arg) => {
            let (mut rng, seed) = arg.seed.rng();
            let x = synthetic::normal_sample(&mut rng, arg.mean_x, arg.std_dev, arg.size_x)?;
            let y = synthetic::normal_sample(&mut rng, arg.mean_y, arg.std_dev, arg.size_y)?;
            (seed, &arg.output, DatasetData::TwoSample { x, y })
        }
        SimulateKind::Regression(arg) => {
            let (mut rng, seed) = arg.seed.rng();
            let (x, y) = synthetic::polynomial_data(
                &mut rng,
                &arg.coefficients,
                arg.x_min,
                arg.x_max,
                arg.noise,
                arg.size,
            )?;
            (seed, &arg.output, DatasetData::Regression { x, y })
        }
        SimulateKind::Expression(arg) => {
            let (mut rng, seed) = arg.seed.rng();
            let matrix = synthetic::expression_matrix(
                &mut rng,
                arg.features,
                arg.group_a,
                arg.group_b,
                arg.shifted,
                arg.effect,
            )?;
            let features = matrix
                .into_iter()
                .enumerate()
                .map(|(i, values)| Feature {
                    id: format!("feature_{i:04}"),
                    values,
                })
                .collect();
            let data = DatasetData::FeatureMatrix {
                group_a_size: arg.group_a,
                features,
            };
            (seed, &arg.output, data)
        }
    };

    eprintln!("Generated `{}` dataset (seed {seed})", data.kind());
    print_shape(&data);

    let dataset = Dataset {
        generated_at: Utc::now(),
        seed: Some(seed),
        data,
    };
    Output::save_json(&dataset, output.output.clone())?;

    if let Some(path) = &output.output {
        eprintln!("Dataset saved to: {}", path.display());
    }
    Ok(())
}

fn print_shape(data: &DatasetData) {
    match data {
        DatasetData::Sample { values } => eprintln!("  Values: {}", values.len()),
        DatasetData::TwoSample { x, y } => eprintln!("  Groups: {} + {}", x.len(), y.len()),
        DatasetData::Regression { x, .. } => eprintln!("  Points: {}", x.len()),
        DatasetData::FeatureMatrix {
            group_a_size,
            features,
        } => {
            let samples = features.first().map_or(0, |f| f.values.len());
            eprintln!(
                "  Features: {}, samples: {group_a_size} + {}",
                features.len(),
                samples.saturating_sub(*group_a_size)
            );
        }
    }
}
