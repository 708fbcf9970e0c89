mod cli;
mod config;
mod dataset;
mod error;
mod hey_binary;
mod load_generator;
mod projection;
mod ramp;
mod run;

pub mod prelude {
    pub use crate::cli::{parse_args, CliArgs, USAGE_EXIT_CODE};
    pub use crate::config::{HeaderMode, RampConfig, RunParameters, DATASET_FILE_NAME};
    pub use crate::dataset::{AggregatedDataset, Fragment, ProjectedRecord, RunFragment};
    pub use crate::error::{RampError, RampResult};
    pub use crate::hey_binary::{resolve_hey_path, HEY_PATH_ENV};
    pub use crate::load_generator::{HeyLoadGenerator, LoadGenerator, RawRunOutput};
    pub use crate::projection::CsvProjector;
    pub use crate::ramp::{concurrency_levels, execute_ramp, persist, run_ramp};
    pub use crate::run::execute_run;
}
