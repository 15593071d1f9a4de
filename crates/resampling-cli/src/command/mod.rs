use clap::{Parser, Subcommand};

use self::{
    bootstrap::BootstrapArg, ecdf::EcdfArg, jackknife::JackknifeArg, kde::KdeArg,
    loocv::LoocvArg, multitest::MultitestArg, permutation_test::PermutationTestArg,
    sample::SampleArg, simulate::SimulateArg,
};

mod bootstrap;
mod ecdf;
mod jackknife;
mod kde;
mod loocv;
mod multitest;
mod permutation_test;
mod sample;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Analysis to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Generate a synthetic dataset
    Simulate(SimulateArg),
    /// Bootstrap confidence interval of a statistic
    Bootstrap(#[clap(flatten)] BootstrapArg),
    /// Two-sample permutation test
    PermutationTest(#[clap(flatten)] PermutationTestArg),
    /// Per-feature two-group tests with multiple-testing correction
    Multitest(#[clap(flatten)] MultitestArg),
    /// Jackknife bias and standard error of a statistic
    Jackknife(#[clap(flatten)] JackknifeArg),
    /// Choose a polynomial degree by leave-one-out cross-validation
    Loocv(#[clap(flatten)] LoocvArg),
    /// Empirical cumulative distribution function
    Ecdf(#[clap(flatten)] EcdfArg),
    /// Kernel density estimate on an evaluation grid
    Kde(#[clap(flatten)] KdeArg),
    /// Draw a sample or permutation from a dataset
    Sample(#[clap(flatten)] SampleArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Bootstrap(arg) => bootstrap::run(&arg)?,
        Mode::PermutationTest(arg) => permutation_test::run(&arg)?,
        Mode::Multitest(arg) => multitest::run(&arg)?,
        Mode::Jackknife(arg) => jackknife::run(&arg)?,
        Mode::Loocv(arg) => loocv::run(&arg)?,
        Mode::Ecdf(arg) => ecdf::run(&arg)?,
        Mode::Kde(arg) => kde::run(&arg)?,
        Mode::Sample(arg) => sample::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition_is_valid() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_multitest_arguments() {
        let args = CommandArgs::try_parse_from([
            "resampling",
            "multitest",
            "data.json",
            "--method",
            "bonferroni",
            "--seed",
            "9",
        ])
        .unwrap();
        assert!(matches!(args.mode, Mode::Multitest(_)));
    }

    #[test]
    fn test_parse_simulate_with_negative_bounds() {
        let args = CommandArgs::try_parse_from([
            "resampling",
            "simulate",
            "regression",
            "--x-min",
            "-3",
            "--coefficients",
            "0,-1.5,2",
        ])
        .unwrap();
        assert!(matches!(args.mode, Mode::Simulate(_)));
    }
}
