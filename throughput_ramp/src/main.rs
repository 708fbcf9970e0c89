use anyhow::Context;
use log::{debug, info};
use throughput_ramp::prelude::*;

const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()?;

    let config = RampConfig::from(parse_args());
    info!("{CRATE_NAME} {CRATE_VERSION}");
    info!(
        "Ramping concurrency from {} to {} in steps of {} against {}",
        config.lower_concurrency, config.upper_concurrency, config.concurrency_step, config.target
    );
    debug!(
        "Throughput averaging interval is {}s, which is not used when collecting samples",
        config.interval_s
    );

    let stored = run_ramp(&config).context("Benchmark failed")?;

    if let Some(path) = stored {
        println!("csv stored locally in file {}", path.display());
    }

    Ok(())
}
