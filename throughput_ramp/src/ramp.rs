use std::path::PathBuf;

use crate::config::RampConfig;
use crate::dataset::AggregatedDataset;
use crate::error::{RampError, RampResult};
use crate::hey_binary::resolve_hey_path;
use crate::load_generator::{HeyLoadGenerator, LoadGenerator};
use crate::projection::CsvProjector;
use crate::run::execute_run;

/// The concurrency levels visited by a ramp, from `lower` to `upper` inclusive.
///
/// Empty when `lower > upper`.
pub fn concurrency_levels(
    lower: u32,
    upper: u32,
    step: u32,
) -> RampResult<impl Iterator<Item = u32>> {
    if step == 0 {
        return Err(RampError::InvalidStep);
    }
    Ok((lower..=upper).step_by(step as usize))
}

/// Run the load generator once per concurrency level and collect every run's samples.
///
/// Runs happen one after the other. The first failing run stops the ramp and its error is
/// returned; nothing collected before it is kept.
pub fn execute_ramp<G>(generator: &G, config: &RampConfig) -> RampResult<AggregatedDataset>
where
    G: LoadGenerator + ?Sized,
{
    let projector = CsvProjector::new(config.allow_invalid_rows);
    let mut dataset = AggregatedDataset::default();

    for concurrency in concurrency_levels(
        config.lower_concurrency,
        config.upper_concurrency,
        config.concurrency_step,
    )? {
        let params = config.run_parameters(concurrency);
        let fragment = execute_run(generator, &params, &projector)?;
        log::debug!(
            "Collected {} samples at concurrency {concurrency}",
            fragment.len()
        );
        dataset.push(concurrency, fragment);
    }

    log::info!(
        "Ramp finished after {} runs with {} samples",
        dataset.runs().len(),
        dataset.record_count()
    );

    Ok(dataset)
}

/// Write `dataset` to the configured `-local-csv` directory.
///
/// Returns the path written to, or `None` if no directory is configured.
pub fn persist(
    dataset: &AggregatedDataset,
    config: &RampConfig,
) -> RampResult<Option<PathBuf>> {
    let Some(path) = config.dataset_path() else {
        log::debug!("No local csv directory configured, not storing results");
        return Ok(None);
    };

    dataset.write_to_file(&path, config.header_mode)?;
    Ok(Some(path))
}

/// Resolve `hey`, run the whole ramp against it and store the results.
///
/// `hey` is not looked up when the concurrency range is empty.
pub fn run_ramp(config: &RampConfig) -> RampResult<Option<PathBuf>> {
    let mut levels = concurrency_levels(
        config.lower_concurrency,
        config.upper_concurrency,
        config.concurrency_step,
    )?;
    if levels.next().is_none() {
        log::warn!(
            "Lower concurrency {} is above upper concurrency {}, nothing to run",
            config.lower_concurrency,
            config.upper_concurrency
        );
        return persist(&AggregatedDataset::default(), config);
    }

    let hey_path = resolve_hey_path(&config.hey_path)?;
    log::debug!("Using hey at {}", hey_path.display());

    let dataset = execute_ramp(&HeyLoadGenerator::new(hey_path), config)?;
    persist(&dataset, config)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use crate::config::{HeaderMode, RunParameters};
    use crate::load_generator::RawRunOutput;

    use super::*;

    fn hey_csv(params: &RunParameters) -> String {
        let mut csv = "response-time,DNS+dialup,status-code\n".to_string();
        for i in 0..params.requests {
            csv.push_str(&format!("0.{}{i},0.00{},200\n", params.concurrency, i));
        }
        csv
    }

    #[test]
    fn test_should_count_concurrency_levels() {
        let count = |lower, upper, step| concurrency_levels(lower, upper, step).unwrap().count();

        assert_eq!(count(1, 30, 1), 30);
        assert_eq!(count(2, 4, 1), 3);
        assert_eq!(count(1, 10, 3), 4);
        assert_eq!(count(1, 11, 5), 3);
        assert_eq!(count(5, 5, 2), 1);
        assert_eq!(count(6, 5, 1), 0);
        assert_eq!(count(0, 0, 1), 1);
        assert_eq!(count(u32::MAX - 1, u32::MAX, 1), 2);
    }

    #[test]
    fn test_should_visit_levels_in_order() {
        let levels = concurrency_levels(2, 10, 4).unwrap().collect::<Vec<_>>();
        assert_eq!(levels, vec![2, 6, 10]);
    }

    #[test]
    fn test_should_reject_zero_step() {
        assert!(matches!(
            concurrency_levels(1, 2, 0).map(|levels| levels.count()),
            Err(RampError::InvalidStep)
        ));
    }

    #[test]
    fn test_should_run_once_per_level() {
        let seen = RefCell::new(Vec::new());
        let generator = |params: &RunParameters| -> RampResult<RawRunOutput> {
            seen.borrow_mut().push(params.concurrency);
            Ok(RawRunOutput::from_stdout(hey_csv(params)))
        };
        let config = RampConfig::default()
            .target("http://localhost")
            .requests(12)
            .rate_limit(100)
            .concurrency(2, 4, 1);

        let dataset = execute_ramp(&generator, &config).unwrap();

        assert_eq!(seen.into_inner(), vec![2, 3, 4]);
        assert_eq!(dataset.runs().len(), 3);
        assert_eq!(dataset.record_count(), 36);
        assert_eq!(
            dataset
                .runs()
                .iter()
                .map(|run| run.concurrency)
                .collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
    }

    #[test]
    fn test_should_not_run_when_range_is_inverted() {
        let calls = RefCell::new(0);
        let generator = |_: &RunParameters| -> RampResult<RawRunOutput> {
            *calls.borrow_mut() += 1;
            Ok(RawRunOutput::default())
        };
        let config = RampConfig::default().concurrency(5, 4, 1);

        let dataset = execute_ramp(&generator, &config).unwrap();

        assert_eq!(calls.into_inner(), 0);
        assert!(dataset.runs().is_empty());
        assert!(dataset.to_csv(HeaderMode::PerRun).unwrap().is_empty());
    }

    #[test]
    fn test_should_abort_on_first_failure() {
        let seen = RefCell::new(Vec::new());
        let generator = |params: &RunParameters| -> RampResult<RawRunOutput> {
            seen.borrow_mut().push(params.concurrency);
            if params.concurrency == 3 {
                return Ok(RawRunOutput::from_stdout("Error distribution:\n  [1] EOF\n"));
            }
            Ok(RawRunOutput::from_stdout(hey_csv(params)))
        };
        let config = RampConfig::default().requests(2).concurrency(1, 10, 1);

        let result = execute_ramp(&generator, &config);

        assert!(matches!(result, Err(RampError::ErrorDistribution { .. })));
        assert_eq!(seen.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn test_should_keep_empty_runs_in_dataset() {
        let generator = |params: &RunParameters| -> RampResult<RawRunOutput> {
            if params.concurrency == 1 {
                return Ok(RawRunOutput::from_stdout("response-time,DNS+dialup\n"));
            }
            Ok(RawRunOutput::from_stdout(hey_csv(params)))
        };
        let config = RampConfig::default().requests(1).concurrency(1, 2, 1);

        let dataset = execute_ramp(&generator, &config).unwrap();

        let csv = String::from_utf8(dataset.to_csv(HeaderMode::PerRun).unwrap()).unwrap();
        assert_eq!(csv, "start-time,response-time\n0.20,0.000\n");
    }

    #[test]
    fn test_should_persist_to_local_csv_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let generator = |params: &RunParameters| -> RampResult<RawRunOutput> {
            Ok(RawRunOutput::from_stdout(hey_csv(params)))
        };
        let config = RampConfig::default()
            .requests(1)
            .concurrency(1, 2, 1)
            .local_csv(dir.path().to_path_buf());

        let dataset = execute_ramp(&generator, &config).unwrap();
        let path = persist(&dataset, &config).unwrap();

        assert_eq!(path, Some(dir.path().join("perfResults.csv")));
        let content = std::fs::read_to_string(dir.path().join("perfResults.csv")).unwrap();
        assert_eq!(
            content,
            "start-time,response-time\n0.10,0.000\nstart-time,response-time\n0.20,0.000\n"
        );
    }

    #[test]
    fn test_should_not_persist_without_local_csv_dir() {
        let path = persist(&AggregatedDataset::default(), &RampConfig::default()).unwrap();
        assert_eq!(path, None);
    }

    #[test]
    fn test_should_fail_before_running_when_hey_is_missing() {
        let config = RampConfig::default()
            .hey_path("/non/existent/path/to/hey")
            .concurrency(1, 1, 1);

        let result = run_ramp(&config);
        assert!(matches!(
            result,
            Err(RampError::LoadGeneratorMissing { .. })
        ));
    }

    #[test]
    fn test_should_not_resolve_hey_when_range_is_inverted() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = RampConfig::default()
            .hey_path("/non/existent/path/to/hey")
            .concurrency(5, 4, 1)
            .local_csv(dir.path().to_path_buf());

        let path = run_ramp(&config).unwrap();

        assert_eq!(path, Some(dir.path().join("perfResults.csv")));
        let content = std::fs::read_to_string(dir.path().join("perfResults.csv")).unwrap();
        assert!(content.is_empty());
    }
}
