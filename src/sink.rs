//! Record persistence.
//!
//! Sinks receive the complete, ordered record sequence once the pipeline
//! has finished and write one row (or object) per record.

use crate::error::Result;
use crate::record::{EnrichedRecord, COLUMNS};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Default output file stem
pub const DEFAULT_FILE_STEM: &str = "scholar_articles";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Persists a finished record sequence.
pub trait RecordSink {
    /// Write all records, returning how many were written.
    fn write(&self, records: &[EnrichedRecord]) -> Result<usize>;
}

/// Output path inside `dir`, or in the current directory when `dir` is `None`.
pub fn default_output_path(dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let file_name = format!("{}.{}", DEFAULT_FILE_STEM, format.extension());
    match dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Build the sink for `format` writing to `path`.
pub fn sink_for(format: OutputFormat, path: PathBuf) -> Box<dyn RecordSink> {
    match format {
        OutputFormat::Csv => Box::new(CsvSink::new(path)),
        OutputFormat::Json => Box::new(JsonSink::new(path)),
    }
}

/// CSV file with a header row, written even when there are no records.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for CsvSink {
    fn write(&self, records: &[EnrichedRecord]) -> Result<usize> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;

        wtr.write_record(COLUMNS)?;
        for record in records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;

        info!(path = ?self.path, count = records.len(), "Saved CSV");
        Ok(records.len())
    }
}

/// Pretty-printed JSON array.
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for JsonSink {
    fn write(&self, records: &[EnrichedRecord]) -> Result<usize> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        info!(path = ?self.path, count = records.len(), "Saved JSON");
        Ok(records.len())
    }
}
