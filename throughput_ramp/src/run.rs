use crate::config::RunParameters;
use crate::dataset::Fragment;
use crate::error::{RampError, RampResult};
use crate::load_generator::LoadGenerator;
use crate::projection::CsvProjector;

/// Marker `hey` prints when some requests in a run failed.
const ERROR_DISTRIBUTION_MARKER: &str = "ERROR DISTRIBUTION";

/// Perform one run at the concurrency level in `params` and project its output.
///
/// The run fails if the generator fails, or if it succeeds but its output mentions an error
/// distribution, matched without regard to case.
pub fn execute_run<G>(
    generator: &G,
    params: &RunParameters,
    projector: &CsvProjector,
) -> RampResult<Fragment>
where
    G: LoadGenerator + ?Sized,
{
    log::info!(
        "Running benchmark with {} requests, {} concurrency, and {} rate limit",
        params.requests,
        params.concurrency,
        params.rate_limit
    );

    let output = generator.generate(params)?;

    let combined = output.combined();
    if reports_error_distribution(&combined) {
        return Err(RampError::ErrorDistribution { output: combined });
    }

    projector.project(&output.stdout)
}

fn reports_error_distribution(output: &str) -> bool {
    output.to_uppercase().contains(ERROR_DISTRIBUTION_MARKER)
}
