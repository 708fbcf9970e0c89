use std::path::PathBuf;
use std::process::Command;

use crate::config::RunParameters;
use crate::error::{RampError, RampResult};

/// What a load generator printed during a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRunOutput {
    pub stdout: String,
    pub stderr: String,
}

impl RawRunOutput {
    /// Output from a generator that only writes to stdout.
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Both streams, stdout first.
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Something that can perform one load test run and hand back its raw output.
///
/// Implementations report failures to start or unsuccessful exits as errors. Interpreting the
/// output is left to the caller.
pub trait LoadGenerator {
    fn generate(&self, params: &RunParameters) -> RampResult<RawRunOutput>;
}

impl<F> LoadGenerator for F
where
    F: Fn(&RunParameters) -> RampResult<RawRunOutput>,
{
    fn generate(&self, params: &RunParameters) -> RampResult<RawRunOutput> {
        self(params)
    }
}

/// Runs the `hey` HTTP load generator as a child process.
#[derive(Debug, Clone)]
pub struct HeyLoadGenerator {
    /// The path to the `hey` executable.
    path: PathBuf,
}

impl HeyLoadGenerator {
    /// Creates a new [`HeyLoadGenerator`] that runs the executable at `path`.
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        HeyLoadGenerator { path: path.into() }
    }

    /// The arguments passed to `hey` for a run.
    ///
    /// Output is requested as CSV and the request timeout is disabled.
    pub fn args(params: &RunParameters) -> Vec<String> {
        vec![
            "-n".to_string(),
            params.requests.to_string(),
            "-c".to_string(),
            params.concurrency.to_string(),
            "-q".to_string(),
            params.rate_limit.to_string(),
            "-o".to_string(),
            "csv".to_string(),
            "-t".to_string(),
            "0".to_string(),
            params.target.clone(),
        ]
    }
}

impl LoadGenerator for HeyLoadGenerator {
    fn generate(&self, params: &RunParameters) -> RampResult<RawRunOutput> {
        let output = Command::new(&self.path)
            .args(Self::args(params))
            .output()
            .map_err(|source| RampError::Spawn {
                path: self.path.clone(),
                source,
            })?;

        let raw = RawRunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        log::debug!(
            "hey finished with status {status}, {stdout} bytes on stdout, {stderr} bytes on stderr",
            status = output.status,
            stdout = raw.stdout.len(),
            stderr = raw.stderr.len(),
        );

        if !output.status.success() {
            return Err(RampError::LoadGeneratorFailed {
                status: output.status,
                output: raw.combined(),
            });
        }

        Ok(raw)
    }
}
