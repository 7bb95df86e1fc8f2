//! Custom error types for rustscholar.
//!
//! All library functions return `Result<T, ScrapeError>`. Most variants are
//! recoverable: the pipeline degrades (empty page, title fallback, dropped
//! block) instead of aborting the run.

use thiserror::Error;

/// Main error type for rustscholar operations.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network/HTTP request error, including timeouts
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a status other than 200
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: i32,
        /// Error message
        message: String,
    },

    /// Rate limited by upstream (HTTP 429)
    #[error("Rate limited, retry after {0}s")]
    RateLimited(u64),

    /// HTML parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Text or keyword extraction failed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl ScrapeError {
    /// True for the errors that only mean "document unavailable".
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ScrapeError::Network(_) | ScrapeError::Api { .. } | ScrapeError::RateLimited(_)
        )
    }
}

/// Result type alias using `ScrapeError`
pub type Result<T> = std::result::Result<T, ScrapeError>;
