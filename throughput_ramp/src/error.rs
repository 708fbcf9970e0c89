use std::path::PathBuf;
use std::process::ExitStatus;

pub type RampResult<T> = Result<T, RampError>;

/// Everything that can abort a ramp.
///
/// None of these are retried. The first one raised stops the ramp and discards whatever was
/// collected so far.
#[derive(Debug, thiserror::Error)]
pub enum RampError {
    #[error("Load generator '{name}' could not be found: {source}")]
    LoadGeneratorNotFound {
        name: String,
        #[source]
        source: which::Error,
    },
    #[error("Load generator path '{}' does not exist", path.display())]
    LoadGeneratorMissing { path: PathBuf },
    #[error("Failed to start load generator '{}': {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("hey error: {status}\nData:\n{output}")]
    LoadGeneratorFailed { status: ExitStatus, output: String },
    /// The generator exited cleanly but reported failed requests in its output.
    #[error("hey error: {output}")]
    ErrorDistribution { output: String },
    #[error("Reading csv records: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv record on line {line} has {found} column(s), expected at least 2")]
    MissingColumns { line: u64, found: usize },
    #[error("Concurrency step must be greater than zero")]
    InvalidStep,
    #[error("Writing csv data to '{}': {source}", path.display())]
    WriteDataset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
