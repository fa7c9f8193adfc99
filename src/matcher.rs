use regex::{Regex, RegexBuilder};

use crate::fetcher::Entry;

/// Case-insensitive keyword patterns, compiled once at startup.
///
/// Keywords are literal text: `C++` matches the characters `C++`, not a
/// repetition of `C`.
#[derive(Debug, Clone)]
pub struct Matcher {
    patterns: Vec<Regex>,
}

impl Matcher {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        let patterns = keywords
            .iter()
            .map(|k| {
                RegexBuilder::new(&regex::escape(k.as_ref()))
                    .case_insensitive(true)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when any keyword occurs in the entry title or description.
    pub fn matches(&self, entry: &Entry) -> bool {
        self.patterns
            .iter()
            .any(|p| p.is_match(&entry.title) || p.is_match(&entry.description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, description: &str) -> Entry {
        Entry {
            id: "1".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_matches_title_case_insensitive() {
        let matcher = Matcher::new(&["sale"]).unwrap();
        assert!(matcher.matches(&entry("Big Sale", "")));
        assert!(matcher.matches(&entry("BIG SALE TODAY", "")));
    }

    #[test]
    fn test_matches_description() {
        let matcher = Matcher::new(&["rust"]).unwrap();
        assert!(matcher.matches(&entry(
            "Weekly digest",
            "<p>New <strong>Rust</strong> release</p>"
        )));
    }

    #[test]
    fn test_no_match() {
        let matcher = Matcher::new(&["sale", "discount"]).unwrap();
        assert!(!matcher.matches(&entry("Weather report", "Rain tomorrow")));
    }

    #[test]
    fn test_any_keyword_is_enough() {
        let matcher = Matcher::new(&["alpha", "beta", "gamma"]).unwrap();
        assert!(matcher.matches(&entry("Gamma rays", "")));
        assert_eq!(matcher.len(), 3);
    }

    #[test]
    fn test_empty_description_is_safe() {
        let matcher = Matcher::new(&["sale"]).unwrap();
        assert!(!matcher.matches(&entry("Nothing here", "")));
    }

    #[test]
    fn test_plus_is_literal() {
        let matcher = Matcher::new(&["C++"]).unwrap();
        assert!(matcher.matches(&entry("Modern c++ tips", "")));
        // As a regex "C++" would match a plain "C"
        assert!(!matcher.matches(&entry("C programming", "")));
    }

    #[test]
    fn test_dot_is_literal() {
        let matcher = Matcher::new(&["a.b"]).unwrap();
        assert!(matcher.matches(&entry("see a.b here", "")));
        assert!(!matcher.matches(&entry("see axb here", "")));
    }

    #[test]
    fn test_other_metacharacters_are_literal() {
        let matcher = Matcher::new(&["(beta)", "[rc]", "$5", "^_^", "a|b"]).unwrap();
        assert!(matcher.matches(&entry("version 2 (BETA) out", "")));
        assert!(matcher.matches(&entry("", "release [RC] build")));
        assert!(matcher.matches(&entry("only $5", "")));
        assert!(matcher.matches(&entry("", "hi ^_^")));
        assert!(!matcher.matches(&entry("a or b", "a or b")));
        assert!(matcher.matches(&entry("pipe a|b", "")));
    }

    #[test]
    fn test_no_keywords_never_match() {
        let matcher = Matcher::new::<&str>(&[]).unwrap();
        assert!(matcher.is_empty());
        assert!(!matcher.matches(&entry("anything", "at all")));
    }
}
