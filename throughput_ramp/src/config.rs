use std::path::PathBuf;

/// Name of the dataset file written into the `-local-csv` directory.
pub const DATASET_FILE_NAME: &str = "perfResults.csv";

/// How per-run headers are written when fragments are concatenated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderMode {
    /// Every non-empty fragment keeps its own `start-time,response-time` header.
    #[default]
    PerRun,
    /// One header at the top of the dataset.
    Single,
}

/// Parameters for a single load generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParameters {
    pub target: String,
    pub requests: u32,
    pub concurrency: u32,
    pub rate_limit: u32,
}

/// The immutable configuration for a full ramp.
///
/// Built once from the command line and passed down by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RampConfig {
    pub target: String,
    pub requests: u32,
    /// Interval in seconds for throughput averaging. Accepted for compatibility, not used.
    pub interval_s: u32,
    pub rate_limit: u32,
    pub lower_concurrency: u32,
    pub upper_concurrency: u32,
    pub concurrency_step: u32,
    pub local_csv: Option<PathBuf>,
    pub hey_path: String,
    pub header_mode: HeaderMode,
    pub allow_invalid_rows: bool,
}

impl Default for RampConfig {
    fn default() -> Self {
        RampConfig {
            target: String::new(),
            requests: 1000,
            interval_s: 1,
            rate_limit: 0,
            lower_concurrency: 1,
            upper_concurrency: 30,
            concurrency_step: 1,
            local_csv: None,
            hey_path: "hey".to_string(),
            header_mode: HeaderMode::PerRun,
            allow_invalid_rows: false,
        }
    }
}

impl RampConfig {
    /// Set `target` option
    pub fn target(mut self, target: &str) -> Self {
        self.target = target.to_string();
        self
    }

    /// Set `requests` option
    pub fn requests(mut self, requests: u32) -> Self {
        self.requests = requests;
        self
    }

    /// Set `rate_limit` option
    pub fn rate_limit(mut self, rate_limit: u32) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Set the inclusive concurrency range and the step between levels
    pub fn concurrency(mut self, lower: u32, upper: u32, step: u32) -> Self {
        self.lower_concurrency = lower;
        self.upper_concurrency = upper;
        self.concurrency_step = step;
        self
    }

    /// Set `local_csv` option
    pub fn local_csv(mut self, dir: PathBuf) -> Self {
        self.local_csv = Some(dir);
        self
    }

    /// Set `hey_path` option
    pub fn hey_path(mut self, path: &str) -> Self {
        self.hey_path = path.to_string();
        self
    }

    /// Set `header_mode` option
    pub fn header_mode(mut self, mode: HeaderMode) -> Self {
        self.header_mode = mode;
        self
    }

    /// Set `allow_invalid_rows` option
    pub fn allow_invalid_rows(mut self, allow: bool) -> Self {
        self.allow_invalid_rows = allow;
        self
    }

    /// The parameters for the run at the given concurrency level.
    pub fn run_parameters(&self, concurrency: u32) -> RunParameters {
        RunParameters {
            target: self.target.clone(),
            requests: self.requests,
            concurrency,
            rate_limit: self.rate_limit,
        }
    }

    /// Where the dataset should be written, if anywhere.
    pub fn dataset_path(&self) -> Option<PathBuf> {
        self.local_csv
            .as_ref()
            .map(|dir| dir.join(DATASET_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_default_like_the_cli() {
        let config = RampConfig::default();
        assert_eq!(config.requests, 1000);
        assert_eq!(config.interval_s, 1);
        assert_eq!(config.rate_limit, 0);
        assert_eq!(config.lower_concurrency, 1);
        assert_eq!(config.upper_concurrency, 30);
        assert_eq!(config.concurrency_step, 1);
        assert_eq!(config.hey_path, "hey");
        assert_eq!(config.local_csv, None);
        assert_eq!(config.header_mode, HeaderMode::PerRun);
    }

    #[test]
    fn test_should_only_vary_concurrency_between_runs() {
        let config = RampConfig::default()
            .target("http://localhost:8080")
            .requests(12)
            .rate_limit(100);

        let first = config.run_parameters(2);
        let second = config.run_parameters(3);
        assert_eq!(first.concurrency, 2);
        assert_eq!(second.concurrency, 3);
        assert_eq!(
            RunParameters {
                concurrency: 2,
                ..second
            },
            first
        );
        assert_eq!(first.target, "http://localhost:8080");
        assert_eq!(first.requests, 12);
        assert_eq!(first.rate_limit, 100);
    }

    #[test]
    fn test_should_place_dataset_in_local_csv_dir() {
        assert_eq!(RampConfig::default().dataset_path(), None);

        let config = RampConfig::default().local_csv(PathBuf::from("/tmp/results"));
        assert_eq!(
            config.dataset_path(),
            Some(PathBuf::from("/tmp/results/perfResults.csv"))
        );
    }
}
