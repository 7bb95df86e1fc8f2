//! Google Scholar scrape-classify-enrich pipeline.
//!
//! Pages are fetched strictly one after another with a fixed pause after
//! each fetch. Within a page, journal entries are enriched concurrently
//! (bounded by `enrich_concurrency`) and reassembled in result order.

use crate::classifier::{classify, Classification};
use crate::config::{ScrapeConfig, RESULTS_PER_PAGE};
use crate::enricher::KeywordEnricher;
use crate::error::{ScrapeError, Result};
use crate::fetcher::Fetcher;
use crate::keywords::KeywordExtractor;
use crate::parser::{self, PageParser, ResultBlock};
use crate::pdf::DocumentReader;
use crate::record::{EnrichedRecord, SearchQuery};
use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use url::Url;

/// Shared stop request, checked before each page.
pub type CancelFlag = Arc<AtomicBool>;

/// Pipeline orchestrator.
///
/// The fetcher, keyword model and document reader are supplied by the
/// caller and may be shared with other scrapers.
pub struct Scraper<F, K, R> {
    config: ScrapeConfig,
    fetcher: Arc<F>,
    parser: PageParser,
    enricher: KeywordEnricher<F, K, R>,
    enrich_slots: Semaphore,
    cancel: Option<CancelFlag>,
}

impl<F, K, R> Scraper<F, K, R>
where
    F: Fetcher,
    K: KeywordExtractor,
    R: DocumentReader,
{
    /// # Errors
    ///
    /// Returns `ScrapeError::Parse` if the result page selectors fail to compile.
    pub fn new(
        config: ScrapeConfig,
        fetcher: Arc<F>,
        extractor: Arc<K>,
        reader: Arc<R>,
    ) -> Result<Self> {
        let parser = PageParser::new()?;
        let enricher = KeywordEnricher::new(Arc::clone(&fetcher), extractor, reader, &config);
        let enrich_slots = Semaphore::new(config.enrich_concurrency.max(1));
        Ok(Self {
            config,
            fetcher,
            parser,
            enricher,
            enrich_slots,
            cancel: None,
        })
    }

    /// Stop between pages once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Run the pipeline and return journal records in page, then result order.
    ///
    /// An unavailable page contributes zero records; the run continues.
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Config` if the base URL is invalid. Nothing
    /// that happens to an individual page or result aborts the run.
    pub async fn run(&self, query: &SearchQuery) -> Result<Vec<EnrichedRecord>> {
        info!(
            query = %query.text,
            pages = query.page_count,
            url = %self.config.scholar_url(),
            "Starting Google Scholar query"
        );

        let mut records = Vec::new();

        for page in 0..query.page_count {
            if self.is_cancelled() {
                warn!(page, collected = records.len(), "Run cancelled");
                break;
            }

            let start = page * RESULTS_PER_PAGE;
            let url = build_search_url(
                self.config.scholar_url(),
                &query.text,
                start,
                &self.config.language,
                &self.config.sdt,
            )?;

            let html = self.fetch_page(&url, page).await;
            tokio::time::sleep(self.config.page_delay).await;

            let blocks = self.parser.parse(&html);
            if blocks.is_empty() && parser::is_captcha_page(&html) {
                warn!(page, "CAPTCHA page returned, no results for this page");
                continue;
            }

            let page_records = self.process_page(blocks, page).await;
            info!(page, count = page_records.len(), "Page processed");
            records.extend(page_records);
        }

        info!(total = records.len(), "Query complete");
        Ok(records)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Page markup, or an empty string when the page is unavailable.
    async fn fetch_page(&self, url: &Url, page: u32) -> String {
        debug!(page, url = %url, "Fetching page");
        match self.fetcher.fetch(url.as_str(), self.config.page_timeout).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(page, error = %e, "Failed to fetch page, continuing with zero results");
                String::new()
            }
        }
    }

    /// Classify, filter and enrich one page of blocks.
    async fn process_page(&self, blocks: Vec<ResultBlock>, page: u32) -> Vec<EnrichedRecord> {
        let parsed = blocks.len();
        let journals: Vec<(ResultBlock, Classification)> = blocks
            .into_iter()
            .filter_map(|block| {
                let classification = classify(&block.author_venue);
                if classification.is_journal {
                    Some((block, classification))
                } else {
                    debug!(page, title = %block.title, venue = %classification.venue, "Dropping non-journal entry");
                    None
                }
            })
            .collect();

        debug!(page, parsed, journals = journals.len(), "Classified page");

        let top_n = self.config.top_n;
        let enrichments = join_all(journals.iter().map(|(block, _)| async move {
            let _permit = self.enrich_slots.acquire().await.ok();
            let enrichment = self.enricher.enrich(&block.link, &block.title, top_n).await;
            debug!(page, title = %block.title, source = ?enrichment.source, "Enriched");
            enrichment
        }))
        .await;

        journals
            .into_iter()
            .zip(enrichments)
            .map(|((block, classification), enrichment)| {
                EnrichedRecord::new(block, classification, enrichment.keywords)
            })
            .collect()
    }
}

/// Build a Google Scholar search URL.
pub fn build_search_url(
    base_url: &str,
    query: &str,
    start: u32,
    language: &str,
    sdt: &str,
) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/scholar", base_url))
        .map_err(|e| ScrapeError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;

    url.query_pairs_mut()
        .append_pair("start", &start.to_string())
        .append_pair("q", query)
        .append_pair("hl", language)
        .append_pair("as_sdt", sdt);

    Ok(url)
}
