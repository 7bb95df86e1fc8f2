//! Two-tier keyword enrichment.
//!
//! Tier 1 downloads a `.pdf` link, reads its text and extracts keywords from
//! it. Whenever tier 1 is not applicable or any of its steps fails, tier 2
//! extracts keywords from the title. If that fails too the record gets an
//! empty keyword string. Nothing here returns an error to the caller.

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::fetcher::Fetcher;
use crate::keywords::{join_terms, Keyword, KeywordExtractor};
use crate::pdf::DocumentReader;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Which tier produced the keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordSource {
    Pdf,
    Title,
    /// Both tiers failed
    None,
}

/// Keywords for one record, comma-joined, with their provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub keywords: String,
    pub source: KeywordSource,
}

/// Result of the PDF tier. Everything except `Keywords` falls back.
#[derive(Debug)]
enum PdfOutcome {
    NotPdf,
    Unavailable(ScrapeError),
    Unreadable(ScrapeError),
    TooShort(usize),
    NoKeywords(ScrapeError),
    Keywords(Vec<Keyword>),
}

/// True if the link ends with `.pdf`, ignoring case.
pub fn is_pdf_link(link: &str) -> bool {
    link.to_lowercase().ends_with(".pdf")
}

pub struct KeywordEnricher<F, K, R> {
    fetcher: Arc<F>,
    extractor: Arc<K>,
    reader: Arc<R>,
    pdf_timeout: Duration,
    min_text_chars: usize,
}

impl<F, K, R> KeywordEnricher<F, K, R>
where
    F: Fetcher,
    K: KeywordExtractor,
    R: DocumentReader,
{
    pub fn new(fetcher: Arc<F>, extractor: Arc<K>, reader: Arc<R>, config: &ScrapeConfig) -> Self {
        Self {
            fetcher,
            extractor,
            reader,
            pdf_timeout: config.pdf_timeout,
            min_text_chars: config.min_text_chars,
        }
    }

    /// Keywords for one result, from its PDF if possible, else its title.
    pub async fn enrich(&self, link: &str, title: &str, top_n: usize) -> Enrichment {
        match self.pdf_tier(link, top_n).await {
            PdfOutcome::Keywords(keywords) => {
                debug!(link = %link, count = keywords.len(), "Keywords from PDF text");
                return Enrichment {
                    keywords: join_terms(&keywords),
                    source: KeywordSource::Pdf,
                };
            }
            PdfOutcome::NotPdf => {}
            PdfOutcome::Unavailable(e) => {
                debug!(link = %link, error = %e, "PDF unavailable, using title");
            }
            PdfOutcome::Unreadable(e) | PdfOutcome::NoKeywords(e) => {
                warn!(link = %link, error = %e, "PDF tier failed, using title");
            }
            PdfOutcome::TooShort(chars) => {
                debug!(link = %link, chars, "PDF text too short, using title");
            }
        }

        self.title_tier(title, top_n)
    }

    async fn pdf_tier(&self, link: &str, top_n: usize) -> PdfOutcome {
        if !is_pdf_link(link) {
            return PdfOutcome::NotPdf;
        }

        let bytes = match self.fetcher.fetch(link, self.pdf_timeout).await {
            Ok(bytes) => bytes,
            Err(e) => return PdfOutcome::Unavailable(e),
        };

        let reader = Arc::clone(&self.reader);
        let text = match tokio::task::spawn_blocking(move || reader.read_text(&bytes)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return PdfOutcome::Unreadable(e),
            Err(e) => {
                return PdfOutcome::Unreadable(ScrapeError::Extraction(format!(
                    "PDF task failed: {}",
                    e
                )))
            }
        };

        let chars = text.trim().chars().count();
        if chars <= self.min_text_chars {
            return PdfOutcome::TooShort(chars);
        }

        match self.extractor.extract_keywords(&text, top_n) {
            Ok(keywords) => PdfOutcome::Keywords(keywords),
            Err(e) => PdfOutcome::NoKeywords(e),
        }
    }

    fn title_tier(&self, title: &str, top_n: usize) -> Enrichment {
        match self.extractor.extract_keywords(title, top_n) {
            Ok(keywords) => Enrichment {
                keywords: join_terms(&keywords),
                source: KeywordSource::Title,
            },
            Err(e) => {
                debug!(title = %title, error = %e, "No keywords for title");
                Enrichment {
                    keywords: String::new(),
                    source: KeywordSource::None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::keywords::KeyTermExtractor;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PDF_TEXT: &str = "Spectral clustering partitions weighted graphs. \
        Spectral methods use eigenvectors of the graph Laplacian for clustering.";

    #[derive(Default)]
    struct StubFetcher {
        documents: HashMap<String, Vec<u8>>,
        calls: AtomicUsize,
    }

    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &str, _timeout: Duration) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.documents.get(url).cloned().ok_or(ScrapeError::Api {
                code: 404,
                message: "HTTP error: 404 Not Found".to_string(),
            })
        }
    }

    /// Treats the bytes as UTF-8 text
    struct TextReader;

    impl DocumentReader for TextReader {
        fn read_text(&self, bytes: &[u8]) -> Result<String> {
            String::from_utf8(bytes.to_vec()).map_err(|e| ScrapeError::Extraction(e.to_string()))
        }
    }

    /// Fails every read, like a corrupt download
    struct FailingReader;

    impl DocumentReader for FailingReader {
        fn read_text(&self, _bytes: &[u8]) -> Result<String> {
            Err(ScrapeError::Extraction("PDF extraction failed: invalid file header".to_string()))
        }
    }

    fn enricher(documents: &[(&str, &str)]) -> Result<KeywordEnricher<StubFetcher, KeyTermExtractor, TextReader>> {
        enricher_with(documents, TextReader)
    }

    fn enricher_with<R: DocumentReader>(
        documents: &[(&str, &str)],
        reader: R,
    ) -> Result<KeywordEnricher<StubFetcher, KeyTermExtractor, R>> {
        let fetcher = StubFetcher {
            documents: documents
                .iter()
                .map(|(url, body)| (url.to_string(), body.as_bytes().to_vec()))
                .collect(),
            calls: AtomicUsize::new(0),
        };
        Ok(KeywordEnricher::new(
            Arc::new(fetcher),
            Arc::new(KeyTermExtractor::new()?),
            Arc::new(reader),
            &ScrapeConfig::default(),
        ))
    }

    #[test]
    fn test_is_pdf_link() {
        assert!(is_pdf_link("https://example.org/paper.pdf"));
        assert!(is_pdf_link("https://example.org/PAPER.PDF"));
        assert!(!is_pdf_link("https://example.org/paper.pdf?download=1"));
        assert!(!is_pdf_link("N/A"));
    }

    #[tokio::test]
    async fn test_pdf_tier_used_when_text_is_long() -> Result<()> {
        let link = "https://example.org/spectral.pdf";
        let enricher = enricher(&[(link, PDF_TEXT)])?;

        let result = enricher.enrich(link, "Deep Residual Learning", 2).await;
        assert_eq!(result.source, KeywordSource::Pdf);
        assert_eq!(result.keywords, "spectral, clustering");
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_title() -> Result<()> {
        let enricher = enricher(&[])?;

        let result = enricher
            .enrich("https://example.org/gone.pdf", "Deep Residual Learning", 5)
            .await;
        assert_eq!(result.source, KeywordSource::Title);
        assert_eq!(result.keywords, "deep, residual, learning");
        assert_eq!(enricher.fetcher.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_short_text_falls_back_to_title() -> Result<()> {
        let link = "https://example.org/short.pdf";
        let enricher = enricher(&[(link, "   Abstract only.   ")])?;

        let result = enricher.enrich(link, "Deep Residual Learning", 5).await;
        assert_eq!(result.source, KeywordSource::Title);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_pdf_link_skips_fetch() -> Result<()> {
        let enricher = enricher(&[])?;

        let result = enricher
            .enrich("https://example.org/article.html", "Deep Residual Learning", 5)
            .await;
        assert_eq!(result.source, KeywordSource::Title);
        assert_eq!(enricher.fetcher.calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_both_tiers_failing_yield_empty_string() -> Result<()> {
        let enricher = enricher(&[])?;

        let result = enricher.enrich("N/A", "The Of And", 5).await;
        assert_eq!(result.source, KeywordSource::None);
        assert_eq!(result.keywords, "");
        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_pdf_falls_back_to_title() -> Result<()> {
        let link = "https://example.org/corrupt.pdf";
        let enricher = enricher_with(&[(link, PDF_TEXT)], FailingReader)?;

        let result = enricher.enrich(link, "Deep Residual Learning", 5).await;
        assert_eq!(result.source, KeywordSource::Title);
        assert_eq!(result.keywords, "deep, residual, learning");
        assert_eq!(enricher.fetcher.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_pdf_without_usable_terms_falls_back_to_title() -> Result<()> {
        let link = "https://example.org/tables.pdf";
        let text = "the of and 2020 ".repeat(10);
        let enricher = enricher(&[(link, text.as_str())])?;

        let result = enricher.enrich(link, "Deep Residual Learning", 5).await;
        assert_eq!(result.source, KeywordSource::Title);
        assert_eq!(result.keywords, "deep, residual, learning");
        Ok(())
    }
}
