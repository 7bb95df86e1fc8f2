//! Run settings for the scrape-classify-enrich pipeline.

use std::time::Duration;

/// Default Google Scholar URL
pub const DEFAULT_SCHOLAR_URL: &str = "https://scholar.google.com";

/// Fixed number of results Google Scholar returns per page
pub const RESULTS_PER_PAGE: u32 = 10;

/// Settings shared by the fetcher, the enricher and the orchestrator.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Base URL, overridable for mirror sites
    pub base_url: String,
    /// Interface language (`hl` parameter)
    pub language: String,
    /// Source data type filter (`as_sdt`, "0,5" for articles only)
    pub sdt: String,
    /// Pause after every page fetch, including the last
    pub page_delay: Duration,
    /// Timeout for a result page request
    pub page_timeout: Duration,
    /// Timeout for a PDF download
    pub pdf_timeout: Duration,
    /// Number of keywords kept per record
    pub top_n: usize,
    /// PDF text must be longer than this (trimmed, in characters) to be used
    pub min_text_chars: usize,
    /// Entries enriched at once within a page
    pub enrich_concurrency: usize,
    /// Proxy URL (e.g., "http://127.0.0.1:7890")
    pub proxy: Option<String>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SCHOLAR_URL.to_string(),
            language: "en".to_string(),
            sdt: "0,5".to_string(),
            page_delay: Duration::from_secs(2),
            page_timeout: Duration::from_secs(30),
            pdf_timeout: Duration::from_secs(10),
            top_n: 5,
            min_text_chars: 50,
            enrich_concurrency: 3,
            proxy: None,
        }
    }
}

impl ScrapeConfig {
    /// Base URL without a trailing slash.
    pub fn scholar_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
