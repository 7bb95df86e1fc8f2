//! Pipeline input and output types.

use crate::classifier::Classification;
use crate::error::{ScrapeError, Result};
use crate::parser::ResultBlock;
use serde::{Deserialize, Serialize};

/// Output column order, significant for the sinks
pub const COLUMNS: &[&str] = &[
    "Title", "Authors", "Link", "Cited By", "Journal", "Keywords", "Year",
];

/// A search to run: query text plus the number of result pages to read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub page_count: u32,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, page_count: u32) -> Self {
        Self {
            text: text.into(),
            page_count,
        }
    }

    /// Build a query from user-supplied text fields.
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Config` if `pages` is not a non-negative integer.
    pub fn parse(text: &str, pages: &str) -> Result<Self> {
        let page_count = pages.trim().parse::<u32>().map_err(|e| {
            ScrapeError::Config(format!("Invalid page count '{}': {}", pages, e))
        })?;
        Ok(Self::new(text, page_count))
    }
}

/// One journal article in the final output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Authors")]
    pub authors: String,
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "Cited By")]
    pub cited_by: String,
    #[serde(rename = "Journal")]
    pub journal: String,
    /// Comma-joined keywords, possibly empty
    #[serde(rename = "Keywords")]
    pub keywords: String,
    #[serde(rename = "Year")]
    pub year: Option<i64>,
}

impl EnrichedRecord {
    pub fn new(block: ResultBlock, classification: Classification, keywords: String) -> Self {
        Self {
            title: block.title,
            authors: block.author_venue,
            link: block.link,
            cited_by: block.cited_by,
            journal: classification.venue,
            keywords,
            year: classification.year,
        }
    }
}
