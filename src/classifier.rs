//! Journal/conference classification and year extraction.
//!
//! Both heuristics work on the author/venue line, whose hyphen-separated
//! segments conventionally end with the venue.

/// Venue substrings that mark a non-journal publication
const NON_JOURNAL_MARKERS: &[&str] = &["conference", "symposium", "proceedings"];

/// Classification derived from one author/venue line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub is_journal: bool,
    /// Text after the last hyphen, trimmed
    pub venue: String,
    pub year: Option<i64>,
}

/// Classify an author/venue line.
pub fn classify(author_venue: &str) -> Classification {
    let venue = venue_segment(author_venue);
    Classification {
        is_journal: is_journal(&venue),
        year: extract_year(author_venue),
        venue,
    }
}

/// Last hyphen-separated segment, trimmed.
pub fn venue_segment(author_venue: &str) -> String {
    author_venue
        .rsplit('-')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// False when the venue mentions a conference, symposium or proceedings.
pub fn is_journal(venue: &str) -> bool {
    let venue = venue.to_lowercase();
    !NON_JOURNAL_MARKERS
        .iter()
        .any(|marker| venue.contains(marker))
}

/// First parenthesised segment that parses as an integer.
///
/// Segments are taken from the whole line split on `-`. Parenthesised
/// segments that do not parse are skipped.
pub fn extract_year(author_venue: &str) -> Option<i64> {
    author_venue
        .split('-')
        .filter(|part| part.contains('(') && part.contains(')'))
        .find_map(|part| {
            part.trim()
                .trim_matches(|c: char| c == '(' || c == ')')
                .trim()
                .parse::<i64>()
                .ok()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("J Smith - IEEE - (2020)"), Some(2020));
        assert_eq!(extract_year("J Smith - IEEE"), None);
        assert_eq!(extract_year("A - (abc) - B - (2019)"), Some(2019));
    }

    #[test]
    fn test_extract_year_takes_first_valid() {
        assert_eq!(extract_year("(2018) - X - (2021)"), Some(2018));
        assert_eq!(extract_year("A Author - Journal of Things (Online)"), None);
        assert_eq!(extract_year("A Author - Nature, 2019"), None);
    }

    #[test]
    fn test_extract_year_beyond_i32() {
        assert_eq!(extract_year("A Author - (3000000000)"), Some(3_000_000_000));
        assert_eq!(extract_year("A Author - (-5)"), None);
    }

    #[test]
    fn test_venue_segment() {
        assert_eq!(
            venue_segment("J Smith, A Lee - Proc. of X - 2019"),
            "2019"
        );
        assert_eq!(venue_segment("J Smith - Nature Methods "), "Nature Methods");
        assert_eq!(venue_segment("no separator"), "no separator");
        assert_eq!(venue_segment("trailing -"), "");
    }

    #[test]
    fn test_conference_venues_are_not_journals() {
        for line in [
            "J Smith - International Conference on Learning",
            "J Smith - ACM SYMPOSIUM on Theory",
            "J Smith - Proceedings of the VLDB Endowment",
            "J Smith - IEEE conference, 2020",
        ] {
            let c = classify(line);
            assert!(!c.is_journal, "{} should not be a journal", line);
        }
    }

    #[test]
    fn test_journal_venues() {
        let c = classify("J Smith, A Lee - Nature Machine Intelligence - (2021)");
        assert!(c.is_journal);
        assert_eq!(c.venue, "(2021)");
        assert_eq!(c.year, Some(2021));

        let c = classify("A Author - Journal of Informetrics");
        assert!(c.is_journal);
        assert_eq!(c.venue, "Journal of Informetrics");
        assert_eq!(c.year, None);
    }

    #[test]
    fn test_only_last_segment_is_checked() {
        // Marker in the author segment does not matter
        let c = classify("Conference Organizers - Journal of Events");
        assert!(c.is_journal);
    }
}
