use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64;
use resampling_stats::histogram::Histogram;

use crate::schema::dataset::Dataset;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read a dataset written by `simulate` (or by hand) from a JSON file
pub fn read_dataset_file<P>(path: P) -> anyhow::Result<Dataset>
where
    P: AsRef<Path>,
{
    read_json_file("dataset", path)
}

/// Output destination shared by every command
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct OutputArg {
    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Random seed for commands that draw random numbers
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SeedArg {
    /// Seed for the random number generator (drawn from OS entropy if omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SeedArg {
    /// Seeded generator together with the seed actually used, so that a run
    /// without `--seed` can still be reproduced from its report.
    pub fn rng(&self) -> (Pcg64, u64) {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        (Pcg64::seed_from_u64(seed), seed)
    }
}

const MAX_BAR_WIDTH: u64 = 50;

/// Print a text histogram to stderr
pub fn print_histogram(histogram: &Histogram) {
    let max_count = histogram
        .bins
        .iter()
        .map(|b| b.count)
        .max()
        .unwrap_or(1)
        .max(1);
    for bin in &histogram.bins {
        let bar_width = usize::try_from(bin.count * MAX_BAR_WIDTH / max_count).unwrap_or(0);
        eprintln!(
            "  {:>10.4} .. {:<10.4} | {:<6} {}",
            bin.range.start,
            bin.range.end,
            bin.count,
            "#".repeat(bar_width)
        );
    }
}
