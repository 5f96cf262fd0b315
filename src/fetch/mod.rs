// src/fetch/mod.rs
// =============================================================================
// This module issues the HTTP GET for each crawled page.
//
// The scheduler only sees the Transport trait, so tests can swap in a fake
// transport and never touch the network.
//
// Submodules:
// - http: the reqwest-backed Transport and Content-Type parsing
// =============================================================================

mod http;

pub use http::{parse_content_type, HttpTransport, DEFAULT_USER_AGENT};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Mime type and charset taken from a `Content-Type` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentType {
    pub mime_type: String,
    pub charset: String,
}

/// What a successful fetch hands back to the scheduler.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    /// True for any 2xx status
    pub ok: bool,
    pub body: String,
    pub content_type: ContentType,
}

impl FetchResponse {
    pub fn is_html(&self) -> bool {
        self.content_type.mime_type == "text/html"
    }
}

/// A fetch that never produced a response (connection, TLS, protocol...).
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Issues one GET per call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError>;
}
