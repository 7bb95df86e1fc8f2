//! # rustscholar
//!
//! Google Scholar journal article scraper with keyword enrichment.
//!
//! ## Modules
//!
//! - [`gscholar`] - Pipeline orchestrator (pagination, politeness delay)
//! - [`fetcher`] - Single-shot HTTP document retrieval
//! - [`parser`] - Result page parsing
//! - [`classifier`] - Journal filter and year extraction
//! - [`enricher`] - PDF/title keyword enrichment
//! - [`keywords`] - Keyword extraction model
//! - [`pdf`] - PDF text reading with scoped temporary files
//! - [`sink`] - CSV/JSON record output
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rustscholar::{HttpFetcher, KeyTermExtractor, PdfReader, ScrapeConfig, Scraper, SearchQuery};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ScrapeConfig::default();
//!     let fetcher = Arc::new(HttpFetcher::new(None)?);
//!     let model = Arc::new(KeyTermExtractor::new()?);
//!     let scraper = Scraper::new(config, fetcher, model, Arc::new(PdfReader::default()))?;
//!
//!     let records = scraper.run(&SearchQuery::new("graph neural networks", 1)).await?;
//!     println!("Found {} journal articles", records.len());
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod enricher;
pub mod error;
pub mod fetcher;
pub mod gscholar;
pub mod keywords;
pub mod parser;
pub mod pdf;
pub mod record;
pub mod sink;

pub use config::ScrapeConfig;
pub use error::{Result, ScrapeError};
pub use fetcher::{Fetcher, HttpFetcher};
pub use gscholar::{CancelFlag, Scraper};
pub use keywords::{KeyTermExtractor, KeywordExtractor};
pub use pdf::{DocumentReader, PdfReader};
pub use record::{EnrichedRecord, SearchQuery};
