//! Google Scholar result page parsing.
//!
//! Turns one page of markup into [`ResultBlock`]s. Extraction is best-effort:
//! a block missing its title heading or its author/venue line is dropped,
//! the rest of the page is still parsed.

use crate::error::{ScrapeError, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Link value used when the title heading carries no anchor
pub const NO_LINK: &str = "N/A";

/// Citation count used when the footer has no "Cited by" link
pub const NO_CITATIONS: &str = "0";

const CITED_BY: &str = "Cited by";

/// One parsed search-result entry, prior to classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBlock {
    /// Full text of the title heading
    pub title: String,
    /// `href` of the first anchor inside the title heading, or "N/A"
    pub link: String,
    /// Raw author/venue line, e.g. "J Smith, A Lee - Nature - 2019"
    pub author_venue: String,
    /// Citation count text, "0" when absent
    pub cited_by: String,
}

struct Selectors {
    item: Selector,
    title: Selector,
    anchor: Selector,
    meta: Selector,
    footer: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        let parse = |css: &str| Selector::parse(css).map_err(|e| ScrapeError::Parse(e.to_string()));
        Ok(Self {
            item: parse("div.gs_ri")?,
            title: parse("h3.gs_rt")?,
            anchor: parse("a")?,
            meta: parse("div.gs_a")?,
            footer: parse("div.gs_fl")?,
        })
    }
}

/// Result page parser holding its compiled selectors.
pub struct PageParser {
    selectors: Selectors,
}

impl PageParser {
    /// # Errors
    ///
    /// Returns `ScrapeError::Parse` if a selector fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            selectors: Selectors::new()?,
        })
    }

    /// Parse Google Scholar HTML into result blocks, in page order.
    ///
    /// Markup problems never fail the page; malformed blocks are skipped.
    pub fn parse(&self, html: &str) -> Vec<ResultBlock> {
        let document = Html::parse_document(html);
        document
            .select(&self.selectors.item)
            .enumerate()
            .filter_map(|(index, item)| parse_block(&self.selectors, item, index))
            .collect()
    }
}

/// Parse one page with a freshly built [`PageParser`].
///
/// # Errors
///
/// Returns `ScrapeError::Parse` only if a selector fails to compile.
pub fn parse_page(html: &str) -> Result<Vec<ResultBlock>> {
    Ok(PageParser::new()?.parse(html))
}

fn parse_block(selectors: &Selectors, item: ElementRef<'_>, index: usize) -> Option<ResultBlock> {
    let Some(title_elem) = item.select(&selectors.title).next() else {
        debug!(index, "Skipping result without title heading");
        return None;
    };
    let title = element_text(title_elem);

    let link = title_elem
        .select(&selectors.anchor)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
        .unwrap_or_else(|| NO_LINK.to_string());

    let Some(meta_elem) = item.select(&selectors.meta).next() else {
        debug!(index, title = %title, "Skipping result without author/venue line");
        return None;
    };
    let author_venue = element_text(meta_elem);

    let cited_by = item
        .select(&selectors.footer)
        .next()
        .and_then(|footer| citation_count(selectors, footer))
        .unwrap_or_else(|| NO_CITATIONS.to_string());

    Some(ResultBlock {
        title,
        link,
        author_venue,
        cited_by,
    })
}

/// Text of the first footer link mentioning "Cited by", minus that phrase.
fn citation_count(selectors: &Selectors, footer: ElementRef<'_>) -> Option<String> {
    footer
        .select(&selectors.anchor)
        .map(element_text)
        .find(|text| text.contains(CITED_BY))
        .map(|text| text.replace(CITED_BY, "").trim().to_string())
}

fn element_text(elem: ElementRef<'_>) -> String {
    elem.text().collect::<String>().trim().to_string()
}

/// True when the markup carries one of Google's bot-check markers.
///
/// Only meaningful for a page that yielded no result blocks; a real result
/// may mention the same phrases.
pub fn is_captcha_page(html: &str) -> bool {
    html.contains("Solving the above CAPTCHA")
        || html.contains("unusual traffic")
        || html.contains("gs_captcha")
}
