// src/error.rs
// =============================================================================
// Error types for the crawler library.
//
// Only a few things are real errors here:
// - Storage I/O failures (fatal, they end the crawl)
// - Bad configuration (caught before the crawl starts)
// - A failing event subscriber (propagated, not isolated)
//
// Pruned nodes and unresolvable links are NOT errors; the scheduler counts
// or drops them. Transport failures have their own type in fetch/ and never
// leave the scheduler.
// =============================================================================

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Errors that can stop a crawl or prevent one from starting.
#[derive(Error, Debug)]
pub enum CrawlError {
    /// Disk I/O failed inside a Dedup Set or Frontier Queue.
    #[error("storage I/O failed on {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A set or queue was created before the storage root was initialized.
    #[error("storage directory {} has not been initialized", .0.display())]
    StorageNotInitialized(PathBuf),

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The hostname inclusion pattern does not compile.
    #[error("invalid hostname pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A JSON config file could not be parsed.
    #[error("could not parse config file: {0}")]
    ConfigFile(#[from] serde_json::Error),

    /// An event subscriber returned an error.
    #[error("event subscriber failed: {0}")]
    Subscriber(anyhow::Error),
}

impl CrawlError {
    /// Wraps an I/O error with the path it happened on.
    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CrawlError::Storage {
            path: path.into(),
            source,
        }
    }
}
