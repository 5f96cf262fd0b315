// src/crawl/links.rs
// =============================================================================
// URL helpers for the scheduler.
//
// - canonicalize: drop the query string, keep everything else. The result is
//   the identity key for page dedup and the form we store and emit.
// - resolve_link: turn a raw href/src into an absolute URL relative to the
//   page it came from.
// =============================================================================

use url::Url;

/// A node that parsed cleanly: its canonical URL and hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNode {
    pub canonical: String,
    pub hostname: String,
    pub scheme: String,
}

/// Parses `node` and strips its query component.
///
/// Returns `None` when the string is not an absolute URL or has no host.
pub fn parse_node(node: &str) -> Option<ParsedNode> {
    let mut url = Url::parse(node).ok()?;
    let hostname = url.host_str()?.to_string();
    url.set_query(None);

    Some(ParsedNode {
        canonical: url.to_string(),
        hostname,
        scheme: url.scheme().to_string(),
    })
}

/// Canonical form of `node`, if it parses.
pub fn canonicalize(node: &str) -> Option<String> {
    let mut url = Url::parse(node).ok()?;
    url.set_query(None);
    Some(url.to_string())
}

// Resolves a link (possibly relative) against the page it was found on.
//
// Anything the url crate can join is kept, even mailto: or javascript:
// links; the scheme check during validation prunes those later.
pub fn resolve_link(base: &Url, href: &str) -> Option<String> {
    base.join(href).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_strips_query_only() {
        let a = canonicalize("https://a.com/x?y=1").unwrap();
        let b = canonicalize("https://a.com/x?y=2").unwrap();
        assert_eq!(a, "https://a.com/x");
        assert_eq!(a, b);
    }

    #[test]
    fn test_canonical_keeps_fragment() {
        assert_eq!(
            canonicalize("https://a.com/x?q=1#part").unwrap(),
            "https://a.com/x#part"
        );
    }

    #[test]
    fn test_parse_node_extracts_hostname() {
        let node = parse_node("http://Sub.Example.com:8080/p?x").unwrap();
        assert_eq!(node.hostname, "sub.example.com");
        assert_eq!(node.canonical, "http://sub.example.com:8080/p");
        assert_eq!(node.scheme, "http");
    }

    #[test]
    fn test_parse_node_rejects_relative_and_hostless() {
        assert!(parse_node("/relative/path").is_none());
        assert!(parse_node("mailto:someone@example.com").is_none());
    }

    #[test]
    fn test_resolve_absolute_link() {
        let base = Url::parse("https://example.com/page").unwrap();
        let result = resolve_link(&base, "https://other.com");
        assert_eq!(result, Some("https://other.com/".to_string()));
    }

    #[test]
    fn test_resolve_relative_link() {
        let base = Url::parse("https://example.com/docs/page").unwrap();
        assert_eq!(
            resolve_link(&base, "/b"),
            Some("https://example.com/b".to_string())
        );
        assert_eq!(
            resolve_link(&base, "other"),
            Some("https://example.com/docs/other".to_string())
        );
    }

    #[test]
    fn test_resolve_unjoinable_link() {
        let base = Url::parse("https://example.com/").unwrap();
        assert_eq!(resolve_link(&base, "http://[::1"), None);
    }
}
