use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result document written by every analysis command
#[derive(Debug, Clone, Serialize)]
pub struct Report<P, R> {
    /// Subcommand that produced the report
    pub command: &'static str,
    /// Timestamp when the analysis finished (ISO 8601 format)
    pub computed_at: DateTime<Utc>,
    pub dataset: PathBuf,
    /// Seed of the random number generator, absent for deterministic commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub parameters: P,
    pub result: R,
}

impl<P, R> Report<P, R> {
    pub fn new(
        command: &'static str,
        dataset: &Path,
        seed: Option<u64>,
        parameters: P,
        result: R,
    ) -> Self {
        Self {
            command,
            computed_at: Utc::now(),
            dataset: dataset.to_owned(),
            seed,
            parameters,
            result,
        }
    }
}
