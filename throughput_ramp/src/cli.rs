use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use crate::config::{HeaderMode, RampConfig};
use crate::hey_binary::HEY_PATH_ENV;

/// Exit code for invalid or missing arguments.
pub const USAGE_EXIT_CODE: i32 = 1;

/// Long flags that may also be written with a single dash, e.g. `-lower-concurrency 2`.
const LONG_FLAGS: &[&str] = &[
    "lower-concurrency",
    "upper-concurrency",
    "concurrency-step",
    "local-csv",
    "hey-path",
    "single-header",
    "allow-invalid-rows",
    "help",
];

#[derive(Debug, Parser)]
#[command(name = "throughputramp", about, long_about = None)]
pub struct CliArgs {
    /// Number of requests to send per run.
    #[arg(short = 'n', default_value_t = 1000)]
    pub num_requests: u32,

    /// Interval in seconds to average throughput.
    #[arg(short = 'i', default_value_t = 1)]
    pub interval: u32,

    /// Rate limit passed to hey for each run.
    #[arg(short = 'q', default_value_t = 0)]
    pub rate_limit: u32,

    /// Starting concurrency value.
    #[arg(long, default_value_t = 1)]
    pub lower_concurrency: u32,

    /// Ending concurrency value.
    #[arg(long, default_value_t = 30)]
    pub upper_concurrency: u32,

    /// Concurrency increase per run.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub concurrency_step: u32,

    /// Stores the csv locally in the given directory when set.
    ///
    /// The results are written to `perfResults.csv` in that directory.
    #[arg(long, default_value = "")]
    pub local_csv: String,

    /// Path to the hey binary. A bare name is looked up in `PATH`.
    #[arg(long, env = HEY_PATH_ENV, default_value = "hey")]
    pub hey_path: String,

    /// Write the csv header once instead of once per run.
    #[arg(long, default_value = "false")]
    pub single_header: bool,

    /// Skip malformed rows in hey's output instead of failing the run.
    #[arg(long, default_value = "false")]
    pub allow_invalid_rows: bool,

    /// The URL to send requests to.
    pub router: String,
}

impl From<CliArgs> for RampConfig {
    fn from(args: CliArgs) -> Self {
        RampConfig {
            target: args.router,
            requests: args.num_requests,
            interval_s: args.interval,
            rate_limit: args.rate_limit,
            lower_concurrency: args.lower_concurrency,
            upper_concurrency: args.upper_concurrency,
            concurrency_step: args.concurrency_step,
            local_csv: (!args.local_csv.is_empty()).then(|| PathBuf::from(args.local_csv)),
            hey_path: args.hey_path,
            header_mode: if args.single_header {
                HeaderMode::Single
            } else {
                HeaderMode::PerRun
            },
            allow_invalid_rows: args.allow_invalid_rows,
        }
    }
}

impl CliArgs {
    /// Parse arguments, accepting single-dash long flags.
    pub fn try_parse_go_style<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_long_flags(args))
    }
}

/// Parse the process arguments.
///
/// Help is printed to stdout with a zero exit code. Any other problem prints the error and usage
/// to stderr and exits with [USAGE_EXIT_CODE].
pub fn parse_args() -> CliArgs {
    match CliArgs::try_parse_go_style(std::env::args_os()) {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            e.print().ok();
            eprintln!();
            std::process::exit(USAGE_EXIT_CODE);
        }
    }
}

/// Rewrite `-long-flag` and `-long-flag=value` to their double-dash form.
///
/// Everything after a bare `--` is passed through untouched.
fn normalize_long_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    let mut normalized = Vec::new();
    for arg in args.into_iter().map(Into::into) {
        if !passthrough {
            passthrough = arg == "--";
            if let Some(long) = arg.to_str().and_then(as_double_dash) {
                normalized.push(OsString::from(long));
                continue;
            }
        }
        normalized.push(arg);
    }
    normalized
}

fn as_double_dash(arg: &str) -> Option<String> {
    let rest = arg.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    LONG_FLAGS.contains(&name).then(|| format!("-{arg}"))
}
