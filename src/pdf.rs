//! PDF text reading.
//!
//! Downloaded bytes are written to a [`ScopedPdf`], a named temporary file
//! that is removed when the guard is dropped, whatever the extraction
//! outcome.

use crate::error::{ScrapeError, Result};
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Turns raw document bytes into plain text.
///
/// Implementations are synchronous; callers run them on the blocking pool.
pub trait DocumentReader: Send + Sync + 'static {
    fn read_text(&self, bytes: &[u8]) -> Result<String>;
}

const TEMP_PREFIX: &str = "rustscholar-";

/// Temporary `.pdf` file deleted on drop.
pub struct ScopedPdf {
    file: NamedTempFile,
}

impl ScopedPdf {
    /// Persist `bytes` to a fresh file in the system temp directory.
    pub fn write(bytes: &[u8]) -> Result<Self> {
        Self::write_in(&std::env::temp_dir(), bytes)
    }

    /// Persist `bytes` to a fresh file inside `dir`.
    pub fn write_in(dir: &Path, bytes: &[u8]) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".pdf")
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// `DocumentReader` backed by `pdf-extract`.
#[derive(Debug, Default, Clone)]
pub struct PdfReader {
    /// Where scoped files are created; the system temp directory when unset
    temp_dir: Option<PathBuf>,
}

impl PdfReader {
    pub fn with_temp_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: Some(dir.into()),
        }
    }
}

impl DocumentReader for PdfReader {
    fn read_text(&self, bytes: &[u8]) -> Result<String> {
        let scoped = match &self.temp_dir {
            Some(dir) => ScopedPdf::write_in(dir, bytes)?,
            None => ScopedPdf::write(bytes)?,
        };
        debug!(path = ?scoped.path(), bytes = bytes.len(), "Extracting PDF text");

        // pdf-extract panics on some malformed documents
        let path = scoped.path();
        match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path))) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ScrapeError::Extraction(format!("PDF extraction failed: {}", e))),
            Err(_) => Err(ScrapeError::Extraction(
                "PDF parser panicked on malformed document".to_string(),
            )),
        }
    }
}
