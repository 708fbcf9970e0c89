use crate::dataset::{Fragment, ProjectedRecord};
use crate::error::{RampError, RampResult};

/// Position of the request start time in the load generator's CSV rows.
const START_TIME: usize = 0;
/// Position of the response time in the load generator's CSV rows.
const RESPONSE_TIME: usize = 1;

/// Projects raw load generator CSV down to (start time, response time) pairs.
///
/// Columns are picked by position, not by header name, so this relies on the generator's column
/// order.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvProjector {
    /// Skip rows that fail to parse instead of failing the run.
    pub allow_invalid_rows: bool,
}

impl CsvProjector {
    pub fn new(allow_invalid_rows: bool) -> Self {
        Self { allow_invalid_rows }
    }

    /// Project `raw`, which must start with a header row.
    ///
    /// A header with no data rows, or no input at all, gives an empty [Fragment].
    pub fn project(&self, raw: &str) -> RampResult<Fragment> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(raw.as_bytes());

        let mut records = Vec::new();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) if self.allow_invalid_rows => {
                    log::warn!("Skipping invalid csv record: {e}");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            match (record.get(START_TIME), record.get(RESPONSE_TIME)) {
                (Some(start_time), Some(response_time)) => {
                    records.push(ProjectedRecord::new(start_time, response_time));
                }
                _ => {
                    let line = record.position().map_or(0, |p| p.line());
                    if self.allow_invalid_rows {
                        log::warn!("Skipping csv record on line {line} with too few columns");
                        continue;
                    }
                    return Err(RampError::MissingColumns {
                        line,
                        found: record.len(),
                    });
                }
            }
        }

        log::debug!("Projected {} csv records", records.len());
        Ok(Fragment::new(records))
    }
}
