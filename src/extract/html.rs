// src/extract/html.rs
// =============================================================================
// DOM-based link extraction.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (built on html5ever, so broken markup is fine)
// - Supports CSS selectors for finding elements
//
// Collected:
// - <a href="...">      anchors
// - <script src="...">  script sources
// =============================================================================

use super::LinkExtractor;
use scraper::{Html, Selector};

/// Extracts anchor hrefs and script srcs from a parsed DOM.
#[derive(Debug)]
pub struct DomExtractor {
    anchors: Selector,
    scripts: Selector,
}

impl DomExtractor {
    pub fn new() -> Self {
        // Both selectors are constants and known to be valid
        DomExtractor {
            anchors: Selector::parse("a[href]").expect("static anchor selector"),
            scripts: Selector::parse("script[src]").expect("static script selector"),
        }
    }
}

impl Default for DomExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkExtractor for DomExtractor {
    fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        let hrefs = document
            .select(&self.anchors)
            .filter_map(|element| element.value().attr("href"));
        let srcs = document
            .select(&self.scripts)
            .filter_map(|element| element.value().attr("src"));

        // Anchors first, then scripts
        hrefs.chain(srcs).map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_raw_hrefs() {
        let html = r#"
            <a href="https://rust-lang.org">Rust</a>
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
        "#;
        let links = DomExtractor::new().extract(html);
        assert_eq!(links, vec!["https://rust-lang.org", "/docs", "../about"]);
    }

    #[test]
    fn test_scripts_follow_anchors() {
        let html = r#"
            <script src="vendor.js"></script>
            <a href="/home">Home</a>
            <script>inline()</script>
        "#;
        let links = DomExtractor::new().extract(html);
        assert_eq!(links, vec!["/home", "vendor.js"]);
    }

    #[test]
    fn test_single_quotes_and_unquoted() {
        let html = "<a href='/single'>x</a><a href=/bare>y</a>";
        let links = DomExtractor::new().extract(html);
        assert_eq!(links, vec!["/single", "/bare"]);
    }

    #[test]
    fn test_anchor_without_href_is_skipped() {
        let html = r#"<a name="top">Top</a><a href="">Empty</a>"#;
        let links = DomExtractor::new().extract(html);
        assert_eq!(links, vec![""]);
    }
}
