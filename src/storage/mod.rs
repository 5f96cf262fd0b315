// src/storage/mod.rs
// =============================================================================
// Out-of-core storage for the crawler.
//
// Two structures keep their contents in files instead of memory:
// - DedupSet: an exact-membership set split into 512 bucket files
// - FrontierQueue: a FIFO queue split into chunk files of 1024 records
//
// Both live under one root directory owned by a StorageManager. The root is
// wiped and recreated once, by an explicit initialize() call, before any set
// or queue is created. Storage is session-scoped: nothing is reloaded on the
// next run.
//
// Record format (shared by buckets and chunks):
//   one record per line, embedded newlines written as the two characters `\n`
//   no other escaping; a torn trailing line after a crash is read back as-is
// =============================================================================

mod dedup;
mod hash;
mod queue;

pub use dedup::DedupSet;
pub use hash::fnv1a_32;
pub use queue::FrontierQueue;

use crate::error::{CrawlError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default root directory for crawl storage.
pub const DEFAULT_STORAGE_DIR: &str = "_storage";

/// Owns the storage root directory for one crawl.
///
/// Construct it once, call [`StorageManager::initialize`], then create the
/// sets and queues through it.
#[derive(Debug)]
pub struct StorageManager {
    root: PathBuf,
    initialized: bool,
}

impl StorageManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        StorageManager {
            root: root.into(),
            initialized: false,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Discards whatever a previous run left behind and recreates the root.
    ///
    /// Only the first call touches the disk; later calls are no-ops so a
    /// second scheduler sharing this manager cannot wipe live files.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                tracing::debug!(root = %self.root.display(), "removed residual storage");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(CrawlError::storage(&self.root, e)),
        }

        fs::create_dir_all(&self.root).map_err(|e| CrawlError::storage(&self.root, e))?;
        self.initialized = true;
        Ok(())
    }

    /// Removes the storage root and everything in it.
    pub fn cleanup(&mut self) -> Result<()> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(CrawlError::storage(&self.root, e)),
        }
        self.initialized = false;
        Ok(())
    }

    /// Creates a named Dedup Set under this root.
    pub fn dedup_set(&self, name: &str) -> Result<DedupSet> {
        DedupSet::create(self.checked_root()?, name)
    }

    /// Creates a named Frontier Queue under this root.
    pub fn frontier_queue(&self, name: &str) -> Result<FrontierQueue> {
        FrontierQueue::create(self.checked_root()?, name)
    }

    fn checked_root(&self) -> Result<&Path> {
        if self.initialized {
            Ok(&self.root)
        } else {
            Err(CrawlError::StorageNotInitialized(self.root.clone()))
        }
    }
}

// Escapes a record for the line-oriented file format.
pub(crate) fn encode_record(value: &str) -> String {
    value.replace('\n', "\\n")
}

pub(crate) fn decode_record(line: &str) -> String {
    line.replace("\\n", "\n")
}

// Appends one escaped record plus its terminating newline.
pub(crate) fn append_record(path: &Path, value: &str) -> Result<()> {
    use std::io::Write;

    let mut file = fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| CrawlError::storage(path, e))?;

    let mut line = encode_record(value);
    line.push('\n');
    file.write_all(line.as_bytes())
        .map_err(|e| CrawlError::storage(path, e))
}

pub(crate) fn create_empty(path: &Path) -> Result<()> {
    fs::write(path, "").map_err(|e| CrawlError::storage(path, e))
}

pub(crate) fn read_all(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| CrawlError::storage(path, e))
}
