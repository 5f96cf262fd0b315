// src/extract/mod.rs
// =============================================================================
// This module pulls raw link strings out of HTML pages.
//
// Two strategies implement the same LinkExtractor trait:
// - pattern: regex over the raw text, anchor hrefs only (fast, lossy)
// - html: a real DOM via scraper, anchor hrefs and script srcs
//
// Neither resolves anything. They return the strings exactly as written in
// the page; turning them into absolute URLs is the scheduler's job.
// =============================================================================

mod html;
mod pattern;

pub use html::DomExtractor;
pub use pattern::PatternExtractor;

/// Finds candidate links in an HTML document.
pub trait LinkExtractor {
    /// Returns raw, possibly relative, link strings in document order.
    fn extract(&self, html: &str) -> Vec<String>;
}

/// Picks the strategy once, at construction time.
pub fn extractor_for(use_deep_parser: bool) -> Box<dyn LinkExtractor> {
    if use_deep_parser {
        Box::new(DomExtractor::new())
    } else {
        Box::new(PatternExtractor::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><script src="/app.js"></script></head>
        <body><a href="/docs">Docs</a></body></html>"#;

    #[test]
    fn test_deep_strategy_sees_scripts() {
        let links = extractor_for(true).extract(PAGE);
        assert!(links.contains(&"/app.js".to_string()));
        assert!(links.contains(&"/docs".to_string()));
    }

    #[test]
    fn test_light_strategy_sees_anchors_only() {
        let links = extractor_for(false).extract(PAGE);
        assert_eq!(links, vec!["/docs"]);
    }
}
