// src/config.rs
// =============================================================================
// Crawl configuration.
//
// Built from CLI flags or loaded from a JSON file. Every field has a default,
// so a JSON file only needs the keys it wants to change:
//
//   { "max_pending_requests": 100, "hostname_regex": "^.+\\.example\\.org$" }
//
// validate() runs when the scheduler is constructed, so a bad value stops the
// crawl before any storage is touched.
// =============================================================================

use crate::error::{CrawlError, Result};
use crate::storage::DEFAULT_STORAGE_DIR;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Outstanding-request threshold. 1 means serial crawling.
    pub max_pending_requests: usize,

    /// Backpressure poll interval in concurrent mode (ms).
    pub request_overflow_cooldown_ms: u64,

    /// Pause when the frontier is empty but fetches are still running (ms).
    pub idle_interval_ms: u64,

    /// DOM-based link extraction instead of the regex one.
    pub use_deep_parser: bool,

    /// Only hostnames matching this pattern are crawled.
    pub hostname_regex: Option<String>,

    /// Directory holding the bucket and chunk files.
    pub storage_dir: PathBuf,

    /// Log a statistics snapshot at most this often (ms). 0 turns it off.
    pub stats_interval_ms: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig {
            max_pending_requests: 1,
            request_overflow_cooldown_ms: 200,
            idle_interval_ms: 1000,
            use_deep_parser: false,
            hostname_regex: None,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            stats_interval_ms: 1000,
        }
    }
}

impl CrawlConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CrawlError::Config(format!("could not read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn is_concurrent(&self) -> bool {
        self.max_pending_requests > 1
    }

    /// Checks the numeric limits and compiles the hostname pattern.
    pub fn validate(&self) -> Result<Option<Regex>> {
        if self.max_pending_requests == 0 {
            return Err(CrawlError::Config(
                "max_pending_requests must be at least 1".to_string(),
            ));
        }
        if self.is_concurrent() && self.request_overflow_cooldown_ms == 0 {
            return Err(CrawlError::Config(
                "request_overflow_cooldown_ms must be positive in concurrent mode".to_string(),
            ));
        }
        if self.is_concurrent() && self.idle_interval_ms == 0 {
            return Err(CrawlError::Config(
                "idle_interval_ms must be positive in concurrent mode".to_string(),
            ));
        }

        let pattern = self
            .hostname_regex
            .as_deref()
            .map(Regex::new)
            .transpose()?;
        Ok(pattern)
    }

    pub fn request_overflow_cooldown(&self) -> Duration {
        Duration::from_millis(self.request_overflow_cooldown_ms)
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }

    pub fn stats_interval(&self) -> Option<Duration> {
        (self.stats_interval_ms > 0).then(|| Duration::from_millis(self.stats_interval_ms))
    }
}
