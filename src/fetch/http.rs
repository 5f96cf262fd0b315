// src/fetch/http.rs
// =============================================================================
// reqwest-backed Transport.
//
// Key functionality:
// - One GET per page, with a browser-like User-Agent header
// - Whole body read as text
// - Content-Type split into mime type and charset
//
// What we deliberately leave to reqwest:
// - Redirects follow the client's default policy
// - No extra timeout; a fetch runs until it completes or fails
// =============================================================================

use super::{ContentType, FetchResponse, Transport, TransportError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

/// Sent with every request so servers treat us like a normal browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const DEFAULT_CHARSET: &str = "utf-8";

/// The real network transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(user_agent: &str) -> Result<Self, TransportError> {
        // Client is reused for every fetch (connection pooling)
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(HttpTransport { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(parse_content_type)
            .unwrap_or_else(|| ContentType {
                mime_type: String::new(),
                charset: DEFAULT_CHARSET.to_string(),
            });

        let body = response.text().await?;

        Ok(FetchResponse {
            status: status.as_u16(),
            ok: status.is_success(),
            body,
            content_type,
        })
    }
}

// Parses a Content-Type header value
//
// Examples:
//   "text/html; charset=UTF-8" -> ("text/html", "utf-8")
//   "text/html"                -> ("text/html", "utf-8")  (default charset)
//   "text/plain;CHARSET=Latin1" -> ("text/plain", "latin1")
pub fn parse_content_type(header: &str) -> ContentType {
    let mut parts = header.split(';');
    let mime_type = parts.next().unwrap_or("").trim().to_string();

    let mut charset = DEFAULT_CHARSET.to_string();
    for param in parts {
        let param = param.trim();
        if let Some((name, value)) = param.split_once('=') {
            if name.trim().eq_ignore_ascii_case("charset") {
                charset = value.trim().trim_matches('"').to_lowercase();
            }
        }
    }

    ContentType { mime_type, charset }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is a non-2xx status not an error here?
//    - The server answered; that is a response, not a transport failure
//    - The scheduler counts it as non-OK and still parses HTML error pages
//
// 2. What does reqwest count as an error?
//    - DNS, connect, TLS and protocol failures
//    - Failing to read the body
//    Those become TransportError and the scheduler moves on.
// -----------------------------------------------------------------------------
