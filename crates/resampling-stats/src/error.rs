/// Errors raised by the resampling routines.
///
/// Numerical routines validate their inputs up front and report the first
/// violation found. Nothing here is recoverable by retrying with the same
/// arguments.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ResampleError {
    #[display("{what} must not be empty")]
    EmptySample { what: &'static str },
    #[display(
        "cannot take a sample of size {requested} without replacement from a population of size {population}"
    )]
    SampleTooLarge { requested: usize, population: usize },
    #[display("length mismatch in {what}: {left} vs {right}")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },
    #[display("invalid weights: {reason}")]
    InvalidWeights { reason: String },
    #[display("invalid percentile: {percentile}")]
    InvalidPercentile { percentile: f64 },
    #[display("invalid p-value: {value}")]
    InvalidPValue { value: f64 },
    #[display("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[display("bandwidth must be positive and finite, got {bandwidth}")]
    InvalidBandwidth { bandwidth: f64 },
    #[display("sample has zero spread; bandwidth cannot be selected")]
    DegenerateSpread,
    #[display("{what} needs at least {needed} observations, got {got}")]
    InsufficientData {
        what: &'static str,
        needed: usize,
        got: usize,
    },
    #[display("statistic of the {what} is undefined (NaN) on the observed data")]
    UndefinedStatistic { what: &'static str },
    #[display("replicate count must be positive")]
    ZeroReplicates,
    #[display("least-squares system is singular")]
    SingularSystem,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ResampleError>;

pub(crate) fn ensure_non_empty<T>(values: &[T], what: &'static str) -> Result<()> {
    if values.is_empty() {
        return Err(ResampleError::EmptySample { what });
    }
    Ok(())
}

pub(crate) fn ensure_replicates(reps: usize) -> Result<()> {
    if reps == 0 {
        return Err(ResampleError::ZeroReplicates);
    }
    Ok(())
}

pub(crate) fn ensure_same_len<T, U>(left: &[T], right: &[U], what: &'static str) -> Result<()> {
    if left.len() != right.len() {
        return Err(ResampleError::LengthMismatch {
            what,
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}
