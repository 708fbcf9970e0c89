use std::io::Write;
use std::path::Path;

use crate::config::HeaderMode;
use crate::error::{RampError, RampResult};

/// Header written at the top of every non-empty fragment.
pub const FRAGMENT_HEADER: [&str; 2] = ["start-time", "response-time"];

/// One request sample, projected from a row of load generator output.
///
/// Values are kept as the text the generator produced so that nothing is lost to re-formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedRecord {
    pub start_time: String,
    pub response_time: String,
}

impl ProjectedRecord {
    pub fn new(start_time: impl Into<String>, response_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            response_time: response_time.into(),
        }
    }
}

/// The projected samples of a single run, in the order the generator reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    records: Vec<ProjectedRecord>,
}

impl Fragment {
    pub fn new(records: Vec<ProjectedRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ProjectedRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Serialize as a standalone two-column CSV. An empty fragment serializes to zero bytes.
    pub fn to_csv(&self) -> RampResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        self.write_csv(&mut writer, true)?;
        finish(writer)
    }

    fn write_csv<W: Write>(&self, writer: &mut csv::Writer<W>, header: bool) -> RampResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        if header {
            writer.write_record(FRAGMENT_HEADER)?;
        }
        for record in &self.records {
            writer.write_record([&record.start_time, &record.response_time])?;
        }
        Ok(())
    }
}

/// A fragment tagged with the concurrency level it was collected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFragment {
    pub concurrency: u32,
    pub fragment: Fragment,
}

/// All fragments of a ramp, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedDataset {
    runs: Vec<RunFragment>,
}

impl AggregatedDataset {
    pub fn push(&mut self, concurrency: u32, fragment: Fragment) {
        self.runs.push(RunFragment {
            concurrency,
            fragment,
        });
    }

    pub fn runs(&self) -> &[RunFragment] {
        &self.runs
    }

    /// Total number of samples across every run.
    pub fn record_count(&self) -> usize {
        self.runs.iter().map(|run| run.fragment.len()).sum()
    }

    /// Concatenate every fragment into one CSV document.
    ///
    /// With [HeaderMode::PerRun] each non-empty fragment brings its own header line.
    /// [HeaderMode::Single] writes the header once.
    pub fn to_csv(&self, header_mode: HeaderMode) -> RampResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut header_written = false;
        for run in &self.runs {
            let header = match header_mode {
                HeaderMode::PerRun => true,
                HeaderMode::Single => !header_written,
            };
            run.fragment.write_csv(&mut writer, header)?;
            header_written |= !run.fragment.is_empty();
        }
        finish(writer)
    }

    /// Write the dataset to `path`, replacing any existing file.
    pub fn write_to_file(&self, path: &Path, header_mode: HeaderMode) -> RampResult<()> {
        let data = self.to_csv(header_mode)?;
        let write_error = |source| RampError::WriteDataset {
            path: path.to_path_buf(),
            source,
        };

        let mut file = std::fs::File::create(path).map_err(write_error)?;
        file.write_all(&data).map_err(write_error)?;
        file.flush().map_err(write_error)?;

        log::debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> RampResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| RampError::Csv(e.into_error().into()))
}
