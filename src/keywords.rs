//! Keyword extraction model.
//!
//! The extractor is constructed once by the caller and shared by reference
//! (usually behind an `Arc`) with every enrichment call.

use crate::error::{ScrapeError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A ranked keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    /// Relevance in `[0, 1]`, higher is better
    pub score: f64,
}

/// Ranks the most representative terms of a text.
pub trait KeywordExtractor: Send + Sync {
    /// Return at most `top_n` keywords, best first.
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Extraction` when the text has no usable terms.
    fn extract_keywords(&self, text: &str, top_n: usize) -> Result<Vec<Keyword>>;
}

/// Join keyword terms the way they are stored in a record.
pub fn join_terms(keywords: &[Keyword]) -> String {
    keywords
        .iter()
        .map(|k| k.term.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Frequency and position based term ranker.
///
/// Candidates are single words of two or more word characters, lower-cased,
/// excluding English stop words and numbers. A term scores higher the more
/// often it occurs and the earlier it first appears.
pub struct KeyTermExtractor {
    token_re: Regex,
    stop_words: HashSet<String>,
}

const FREQUENCY_WEIGHT: f64 = 0.7;
const POSITION_WEIGHT: f64 = 0.3;

struct TermStats {
    count: usize,
    first: usize,
}

impl KeyTermExtractor {
    pub fn new() -> Result<Self> {
        let token_re =
            Regex::new(r"\b\w\w+\b").map_err(|e| ScrapeError::Config(e.to_string()))?;
        let stop_words = stop_words::get(stop_words::LANGUAGE::English)
            .into_iter()
            .map(|w| w.to_string())
            .collect();
        Ok(Self {
            token_re,
            stop_words,
        })
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        self.token_re
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .filter(|token| !self.stop_words.contains(token))
            .filter(|token| !token.chars().all(|c| c.is_ascii_digit()))
            .collect()
    }
}

impl KeywordExtractor for KeyTermExtractor {
    fn extract_keywords(&self, text: &str, top_n: usize) -> Result<Vec<Keyword>> {
        let tokens = self.tokenize(text);
        if tokens.is_empty() {
            return Err(ScrapeError::Extraction("empty vocabulary".to_string()));
        }

        let mut stats: HashMap<&str, TermStats> = HashMap::new();
        for (position, token) in tokens.iter().enumerate() {
            stats
                .entry(token.as_str())
                .and_modify(|s| s.count += 1)
                .or_insert(TermStats {
                    count: 1,
                    first: position,
                });
        }

        let max_count = stats.values().map(|s| s.count).max().unwrap_or(1) as f64;
        let total = tokens.len() as f64;

        let mut ranked: Vec<(&str, f64, usize)> = stats
            .iter()
            .map(|(term, s)| {
                let frequency = s.count as f64 / max_count;
                let position = 1.0 - s.first as f64 / total;
                let score = FREQUENCY_WEIGHT * frequency + POSITION_WEIGHT * position;
                (*term, (score * 10_000.0).round() / 10_000.0, s.first)
            })
            .collect();

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.2.cmp(&b.2)));

        Ok(ranked
            .into_iter()
            .take(top_n)
            .map(|(term, score, _)| Keyword {
                term: term.to_string(),
                score,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(keywords: &[Keyword]) -> Vec<&str> {
        keywords.iter().map(|k| k.term.as_str()).collect()
    }

    #[test]
    fn test_title_terms_in_order() -> Result<()> {
        let model = KeyTermExtractor::new()?;
        let keywords =
            model.extract_keywords("Graph Neural Networks for Traffic Forecasting", 5)?;
        assert_eq!(
            terms(&keywords),
            vec!["graph", "neural", "networks", "traffic", "forecasting"]
        );
        Ok(())
    }

    #[test]
    fn test_frequent_terms_rank_first() -> Result<()> {
        let model = KeyTermExtractor::new()?;
        let text = "We study attention. Attention layers improve attention-based \
                    transformers; transformers scale with data.";
        let keywords = model.extract_keywords(text, 2)?;
        assert_eq!(terms(&keywords), vec!["attention", "transformers"]);
        assert!(keywords[0].score >= keywords[1].score);
        Ok(())
    }

    #[test]
    fn test_top_n_limits_output() -> Result<()> {
        let model = KeyTermExtractor::new()?;
        let keywords = model.extract_keywords("alpha beta gamma delta epsilon zeta", 3)?;
        assert_eq!(keywords.len(), 3);
        Ok(())
    }

    #[test]
    fn test_degenerate_input_fails() -> Result<()> {
        let model = KeyTermExtractor::new()?;
        assert!(model.extract_keywords("", 5).is_err());
        assert!(model.extract_keywords("the of and 2020 a", 5).is_err());
        Ok(())
    }

    #[test]
    fn test_deterministic() -> Result<()> {
        let model = KeyTermExtractor::new()?;
        let text = "sparse graphs dense graphs random walks sparse embeddings";
        let first = model.extract_keywords(text, 5)?;
        let second = model.extract_keywords(text, 5)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_join_terms() {
        let keywords = vec![
            Keyword {
                term: "graph".to_string(),
                score: 0.9,
            },
            Keyword {
                term: "neural".to_string(),
                score: 0.8,
            },
        ];
        assert_eq!(join_terms(&keywords), "graph, neural");
        assert_eq!(join_terms(&[]), "");
    }
}
