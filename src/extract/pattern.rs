// src/extract/pattern.rs
// =============================================================================
// Regex-based link extraction.
//
// Matches href="..." with double quotes only, where the value has at least
// two characters and no whitespace. No DOM is built, so this is much cheaper
// than the html extractor, at the cost of missing single-quoted or
// unquoted attributes, one-character values like "/" and everything
// that is not an anchor href.
// =============================================================================

use super::LinkExtractor;
use regex::Regex;

#[derive(Debug)]
pub struct PatternExtractor {
    href: Regex,
}

impl PatternExtractor {
    pub fn new() -> Self {
        PatternExtractor {
            href: Regex::new(r#"href="([^"\s]{2,})""#).expect("static href pattern"),
        }
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkExtractor for PatternExtractor {
    fn extract(&self, html: &str) -> Vec<String> {
        self.href
            .captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
